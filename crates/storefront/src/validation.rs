//! Field-level form validation.
//!
//! Forms are plain structs; each one runs its rules through a [`Validator`]
//! and gets back either `Ok(())` or a [`FormErrors`] map keyed by field name.
//! Errors are only shown for fields the shopper has touched, which is what
//! [`TouchedFields`] tracks. A blocked submit touches every field so that all
//! messages render.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use rust_decimal::Decimal;

use qorikusi_core::Email;

/// A single rule violation on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The field is empty (or only whitespace).
    Required,
    /// The value is not a syntactically valid email address.
    InvalidEmail,
    /// Fewer characters than `required`.
    MinLength { required: usize },
    /// More characters than `required`.
    MaxLength { required: usize },
    /// A numeric value below `min`.
    Min { min: Decimal },
    /// A checkbox that must be ticked is not.
    MustAccept,
    /// A value outside the offered choices.
    UnknownOption,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "This field is required"),
            Self::InvalidEmail => write!(f, "Enter a valid email address"),
            Self::MinLength { required } => write!(f, "Minimum {required} characters"),
            Self::MaxLength { required } => write!(f, "Maximum {required} characters"),
            Self::Min { min } => write!(f, "The minimum value is {min}"),
            Self::MustAccept => write!(f, "You must accept to continue"),
            Self::UnknownOption => write!(f, "Choose one of the listed options"),
        }
    }
}

/// Validation failures for a whole form, one error per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("invalid fields: {}", join_fields(.errors))]
pub struct FormErrors {
    errors: BTreeMap<&'static str, FieldError>,
}

impl FormErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error unless the field already has one.
    ///
    /// Rules run in declaration order, so the first failing rule is the one
    /// reported (e.g. `Required` before `MinLength`).
    pub fn add(&mut self, field: &'static str, error: FieldError) {
        self.errors.entry(field).or_insert(error);
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.errors.get(field)
    }

    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn field_names(&self) -> Vec<&'static str> {
        self.errors.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldError)> {
        self.errors.iter().map(|(field, error)| (*field, error))
    }
}

fn join_fields(errors: &BTreeMap<&'static str, FieldError>) -> String {
    errors.keys().copied().collect::<Vec<_>>().join(", ")
}

/// Fields the shopper has interacted with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TouchedFields(BTreeSet<&'static str>);

impl TouchedFields {
    pub fn touch(&mut self, field: &'static str) {
        self.0.insert(field);
    }

    pub fn touch_all(&mut self, fields: &[&'static str]) {
        self.0.extend(fields.iter().copied());
    }

    #[must_use]
    pub fn is_touched(&self, field: &str) -> bool {
        self.0.contains(field)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Errors that should be rendered: invalid and touched.
    pub fn visible<'a>(
        &'a self,
        errors: &'a FormErrors,
    ) -> impl Iterator<Item = (&'static str, &'a FieldError)> + 'a {
        errors.iter().filter(|(field, _)| self.is_touched(field))
    }
}

/// Accumulates rule violations for one form.
#[derive(Debug, Default)]
pub struct Validator {
    errors: FormErrors,
}

impl Validator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(&mut self, field: &'static str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.errors.add(field, FieldError::Required);
        }
        self
    }

    /// Minimum character count. Empty values are left to [`Self::required`].
    pub fn min_length(&mut self, field: &'static str, value: &str, required: usize) -> &mut Self {
        if !value.is_empty() && value.chars().count() < required {
            self.errors.add(field, FieldError::MinLength { required });
        }
        self
    }

    pub fn max_length(&mut self, field: &'static str, value: &str, required: usize) -> &mut Self {
        if value.chars().count() > required {
            self.errors.add(field, FieldError::MaxLength { required });
        }
        self
    }

    /// Email syntax. Empty values are left to [`Self::required`].
    pub fn email(&mut self, field: &'static str, value: &str) -> &mut Self {
        if !value.is_empty() && Email::parse(value).is_err() {
            self.errors.add(field, FieldError::InvalidEmail);
        }
        self
    }

    pub fn min_value(&mut self, field: &'static str, value: Decimal, min: Decimal) -> &mut Self {
        if value < min {
            self.errors.add(field, FieldError::Min { min });
        }
        self
    }

    pub fn accepted(&mut self, field: &'static str, value: bool) -> &mut Self {
        if !value {
            self.errors.add(field, FieldError::MustAccept);
        }
        self
    }

    /// Reject a non-blank value the caller does not recognise.
    pub fn one_of(
        &mut self,
        field: &'static str,
        value: &str,
        known: impl Fn(&str) -> bool,
    ) -> &mut Self {
        if !value.trim().is_empty() && !known(value) {
            self.errors.add(field, FieldError::UnknownOption);
        }
        self
    }

    /// Finish validation.
    ///
    /// # Errors
    ///
    /// Returns the collected [`FormErrors`] if any rule failed.
    pub fn finish(self) -> Result<(), FormErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_first_failing_rule_wins() {
        let mut v = Validator::new();
        v.required("card_number", "").min_length("card_number", "", 16);
        let errors = v.finish().unwrap_err();
        assert_eq!(errors.get("card_number"), Some(&FieldError::Required));
    }

    #[test]
    fn test_min_length_counts_chars() {
        let mut v = Validator::new();
        v.min_length("cvv", "12", 3);
        assert_eq!(
            v.finish().unwrap_err().get("cvv"),
            Some(&FieldError::MinLength { required: 3 })
        );

        let mut v = Validator::new();
        v.min_length("name", "ñañ", 3);
        assert!(v.finish().is_ok());
    }

    #[test]
    fn test_whitespace_is_not_a_value() {
        let mut v = Validator::new();
        v.required("city", "   ");
        assert!(v.finish().unwrap_err().has("city"));
    }

    #[test]
    fn test_email_and_min_value() {
        let mut v = Validator::new();
        v.email("email", "not-an-email").min_value("price", dec!(0), dec!(0.01));
        let errors = v.finish().unwrap_err();
        assert_eq!(errors.get("email"), Some(&FieldError::InvalidEmail));
        assert_eq!(errors.get("price"), Some(&FieldError::Min { min: dec!(0.01) }));
        assert_eq!(errors.to_string(), "invalid fields: email, price");
    }

    #[test]
    fn test_one_of_skips_blank_values() {
        let known = |value: &str| value == "Amor";

        let mut v = Validator::new();
        v.one_of("energy", "  ", known).one_of("tag", "Amor", known);
        assert!(v.finish().is_ok());

        let mut v = Validator::new();
        v.one_of("energy", "Eclipse", known);
        assert_eq!(
            v.finish().unwrap_err().get("energy"),
            Some(&FieldError::UnknownOption)
        );
    }

    #[test]
    fn test_visible_errors_only_for_touched_fields() {
        let mut errors = FormErrors::new();
        errors.add("email", FieldError::Required);
        errors.add("phone", FieldError::Required);

        let mut touched = TouchedFields::default();
        assert_eq!(touched.visible(&errors).count(), 0);

        touched.touch("email");
        let visible: Vec<_> = touched.visible(&errors).map(|(f, _)| f).collect();
        assert_eq!(visible, vec!["email"]);

        touched.touch_all(&["email", "phone"]);
        assert_eq!(touched.visible(&errors).count(), 2);
    }

    #[test]
    fn test_messages() {
        assert_eq!(FieldError::Required.to_string(), "This field is required");
        assert_eq!(
            FieldError::MinLength { required: 16 }.to_string(),
            "Minimum 16 characters"
        );
    }
}
