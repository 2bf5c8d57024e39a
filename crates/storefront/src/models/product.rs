//! Catalog domain types as served by the products service.
//!
//! Field names on the wire follow the products service JSON (`nombre`,
//! `precio`, ...); the Rust side uses English names.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use qorikusi_core::{CategoryId, CurrencyCode, Price, ProductId};

/// A purchasable catalog product.
///
/// Read-only from the query engine's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Stable unique identifier.
    #[serde(rename = "uuid")]
    pub id: ProductId,
    /// Display name.
    #[serde(rename = "nombre")]
    pub name: String,
    /// Free-text description.
    #[serde(rename = "descripcion", default)]
    pub description: String,
    /// Unit price, non-negative.
    #[serde(rename = "precio", deserialize_with = "deserialize_price")]
    pub price: Decimal,
    /// Category label (e.g. "Collares").
    #[serde(rename = "categoria", default)]
    pub category: String,
    /// Optional lunar energy tag (e.g. "Luna Llena").
    #[serde(rename = "energiaLunar", default, skip_serializing_if = "Option::is_none")]
    pub energy: Option<String>,
    /// Units in stock.
    #[serde(default)]
    pub stock: u32,
    /// Image URL.
    #[serde(rename = "imagen", default)]
    pub image: String,
}

/// Reject negative prices at the wire boundary.
fn deserialize_price<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
    Price::try_new(amount, CurrencyCode::default())
        .map(|price| price.amount)
        .map_err(serde::de::Error::custom)
}

impl Product {
    /// Whether at least one unit is in stock.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// A product category from the admin categories endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub uuid: CategoryId,
    pub nombre: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
}

/// Paginated result envelope returned by the catalog endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    /// Items on this page.
    pub content: Vec<T>,
    /// Total items across all pages.
    pub total_elements: u64,
    /// Total number of pages.
    pub total_pages: u32,
    /// Requested page size.
    pub size: u32,
    /// Zero-based page index.
    pub number: u32,
}

impl<T> PageResponse<T> {
    /// Whether a page after this one exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.number + 1 < self.total_pages
    }

    /// Whether a page before this one exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.number > 0
    }
}

/// Body for creating or updating a product through the admin endpoints.
///
/// Build one from a validated [`crate::catalog::ProductDraft`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRequest {
    pub nombre: String,
    pub descripcion: String,
    pub precio: Decimal,
    pub stock: u32,
    pub categoria: String,
    #[serde(rename = "energiaLunar", default, skip_serializing_if = "Option::is_none")]
    pub energia_lunar: Option<String>,
    pub imagen: String,
}
