//! Client-side catalog query engine.
//!
//! The products service returns the whole active catalog in one request, and
//! all searching, filtering and sorting happens in memory. Every function
//! here is pure: it takes a product slice and returns a new `Vec` without
//! touching its input.
//!
//! None of these operations fail. A blank search, an empty category, an
//! absent bound or an unknown sort key is an identity transform.
//!
//! # Example
//!
//! ```rust
//! use qorikusi_storefront::catalog::{self, FilterCriteria, SortKey};
//! # let products: Vec<qorikusi_storefront::models::Product> = Vec::new();
//!
//! let criteria = FilterCriteria::new()
//!     .with_search("luna")
//!     .with_category("collares")
//!     .sorted_by(SortKey::PriceAsc);
//! let visible = catalog::apply_all(&criteria, &products);
//! # assert!(visible.is_empty());
//! ```

mod collation;
mod criteria;
mod draft;
mod source;
mod store;

use std::collections::BTreeSet;

use rust_decimal::Decimal;

use crate::models::{PageResponse, Product};

pub use criteria::{FilterCriteria, SortKey};
pub use draft::{ProductDraft, product_fields};
pub use source::{CatalogSource, CategorySource, ProductAdmin};
pub use store::CatalogStore;

/// Case-insensitive substring search over name, description and category.
#[must_use]
pub fn search(text: &str, products: &[Product]) -> Vec<Product> {
    let needle = text.trim().to_lowercase();
    if needle.is_empty() {
        return products.to_vec();
    }

    products
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle)
                || p.description.to_lowercase().contains(&needle)
                || p.category.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Case-insensitive exact match on the category label.
#[must_use]
pub fn by_category(category: &str, products: &[Product]) -> Vec<Product> {
    let wanted = category.trim().to_lowercase();
    if wanted.is_empty() {
        return products.to_vec();
    }

    products
        .iter()
        .filter(|p| p.category.to_lowercase() == wanted)
        .cloned()
        .collect()
}

/// Inclusive price bounds; an absent bound is open-ended.
#[must_use]
pub fn by_price_range(
    min: Option<Decimal>,
    max: Option<Decimal>,
    products: &[Product],
) -> Vec<Product> {
    products
        .iter()
        .filter(|p| min.is_none_or(|min| p.price >= min))
        .filter(|p| max.is_none_or(|max| p.price <= max))
        .cloned()
        .collect()
}

/// Case-insensitive exact match on the lunar energy tag.
///
/// Untagged products never match a non-empty tag.
#[must_use]
pub fn by_energy_tag(tag: &str, products: &[Product]) -> Vec<Product> {
    let wanted = tag.trim().to_lowercase();
    if wanted.is_empty() {
        return products.to_vec();
    }

    products
        .iter()
        .filter(|p| {
            p.energy
                .as_deref()
                .is_some_and(|energy| energy.to_lowercase() == wanted)
        })
        .cloned()
        .collect()
}

/// Stable sort on `key`. [`SortKey::None`] keeps the incoming order.
#[must_use]
pub fn sort(key: SortKey, products: &[Product]) -> Vec<Product> {
    let mut sorted = products.to_vec();
    match key {
        SortKey::PriceAsc => sorted.sort_by(|a, b| a.price.cmp(&b.price)),
        SortKey::PriceDesc => sorted.sort_by(|a, b| b.price.cmp(&a.price)),
        SortKey::NameAsc => sorted.sort_by(|a, b| collation::compare(&a.name, &b.name)),
        SortKey::NameDesc => sorted.sort_by(|a, b| collation::compare(&b.name, &a.name)),
        SortKey::None => {}
    }
    sorted
}

/// Apply every criterion in a fixed order: search, category, price range,
/// energy tag, then sort.
#[must_use]
pub fn apply_all(criteria: &FilterCriteria, products: &[Product]) -> Vec<Product> {
    let mut result = products.to_vec();

    if let Some(text) = criteria.search.as_deref() {
        result = search(text, &result);
    }
    if let Some(category) = criteria.category.as_deref() {
        result = by_category(category, &result);
    }
    if criteria.min_price.is_some() || criteria.max_price.is_some() {
        result = by_price_range(criteria.min_price, criteria.max_price, &result);
    }
    if let Some(energy) = criteria.energy.as_deref() {
        result = by_energy_tag(energy, &result);
    }

    sort(criteria.sort, &result)
}

/// Distinct category labels present in `products`, sorted.
///
/// Lets public pages build a category menu without the admin-only
/// categories endpoint.
#[must_use]
pub fn categories_from_products(products: &[Product]) -> Vec<String> {
    products
        .iter()
        .map(|p| p.category.clone())
        .filter(|c| !c.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Slice a (filtered) product list into a page.
///
/// `page` is zero-based. A `size` of zero is treated as one. A page past the
/// end is empty but still reports the correct totals.
#[must_use]
pub fn paginate(products: &[Product], page: u32, size: u32) -> PageResponse<Product> {
    let size = size.max(1);
    let total = products.len();
    let page_size = size as usize;
    let start = (page as usize).saturating_mul(page_size);

    let content = products
        .iter()
        .skip(start)
        .take(page_size)
        .cloned()
        .collect();

    PageResponse {
        content,
        total_elements: total as u64,
        total_pages: u32::try_from(total.div_ceil(page_size)).unwrap_or(u32::MAX),
        size,
        number: page,
    }
}
