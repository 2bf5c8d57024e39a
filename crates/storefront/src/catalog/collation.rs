//! Locale-aware ordering for product names.
//!
//! Names are compared the way a Spanish-language shopper expects: case and
//! accents are ignored at the first level ("Corazón" sits between "Collar"
//! and "Cristal"), and `ñ` is its own letter after `n`. Ties are broken by
//! accents, then case (lowercase first), then code point order, so the
//! comparison is a total order.

use std::cmp::Ordering;

/// Compare two display strings in catalog order.
#[must_use]
pub fn compare(a: &str, b: &str) -> Ordering {
    a.chars()
        .map(primary)
        .cmp(b.chars().map(primary))
        .then_with(|| a.chars().map(secondary).cmp(b.chars().map(secondary)))
        .then_with(|| a.chars().map(tertiary).cmp(b.chars().map(tertiary)))
        .then_with(|| a.cmp(b))
}

/// Base letter weight. Doubled so `ñ` can slot in right after `n`.
fn primary(c: char) -> u32 {
    let lower = c.to_lowercase().next().unwrap_or(c);
    if lower == 'ñ' {
        return u32::from('n') * 2 + 1;
    }
    u32::from(base_letter(lower)) * 2
}

/// 0 for plain letters, 1 for accented ones.
fn secondary(c: char) -> u8 {
    let lower = c.to_lowercase().next().unwrap_or(c);
    u8::from(lower != 'ñ' && base_letter(lower) != lower)
}

/// 0 for lowercase, 1 for uppercase.
fn tertiary(c: char) -> u8 {
    u8::from(c.is_uppercase())
}

const fn base_letter(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        'ç' => 'c',
        other => other,
    }
}
