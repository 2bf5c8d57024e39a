//! Filter criteria and sort keys for catalog queries.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Ordering applied as the last stage of a catalog query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortKey {
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
    /// Keep the incoming order.
    #[default]
    None,
}

impl SortKey {
    /// Parse a sort key from its query-string form.
    ///
    /// Never fails: anything unrecognized is [`SortKey::None`]. The bare
    /// `name` key used by older listing pages means ascending by name.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "price-asc" => Self::PriceAsc,
            "price-desc" => Self::PriceDesc,
            "name-asc" | "name" => Self::NameAsc,
            "name-desc" => Self::NameDesc,
            _ => Self::None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
            Self::None => "",
        }
    }
}

impl From<&str> for SortKey {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<String> for SortKey {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<SortKey> for String {
    fn from(key: SortKey) -> Self {
        key.as_str().to_owned()
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bundle of optional, independent catalog filters plus a sort key.
///
/// Every absent field is an identity transform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub search: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub energy: Option<String>,
    pub sort: SortKey,
}

impl FilterCriteria {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub const fn with_price_range(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    #[must_use]
    pub fn with_energy(mut self, energy: impl Into<String>) -> Self {
        self.energy = Some(energy.into());
        self
    }

    #[must_use]
    pub const fn sorted_by(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    /// Whether applying these criteria is guaranteed to be an identity.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        is_blank(self.search.as_deref())
            && is_blank(self.category.as_deref())
            && self.min_price.is_none()
            && self.max_price.is_none()
            && is_blank(self.energy.as_deref())
            && self.sort == SortKey::None
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_sort_key_parse() {
        assert_eq!(SortKey::parse("price-asc"), SortKey::PriceAsc);
        assert_eq!(SortKey::parse(" PRICE-DESC "), SortKey::PriceDesc);
        assert_eq!(SortKey::parse("name"), SortKey::NameAsc);
        assert_eq!(SortKey::parse("name-desc"), SortKey::NameDesc);
        assert_eq!(SortKey::parse("popularity"), SortKey::None);
        assert_eq!(SortKey::parse(""), SortKey::None);
    }

    #[test]
    fn test_criteria_deserialize_tolerates_unknown_sort() {
        let criteria: FilterCriteria =
            serde_json::from_str(r#"{"search": "luna", "sort": "newest"}"#).unwrap();
        assert_eq!(criteria.search.as_deref(), Some("luna"));
        assert_eq!(criteria.sort, SortKey::None);
    }

    #[test]
    fn test_is_empty() {
        assert!(FilterCriteria::new().is_empty());
        assert!(FilterCriteria::new().with_search("  ").is_empty());
        assert!(!FilterCriteria::new().with_price_range(Some(dec!(10)), None).is_empty());
        assert!(!FilterCriteria::new().sorted_by(SortKey::NameAsc).is_empty());
    }
}
