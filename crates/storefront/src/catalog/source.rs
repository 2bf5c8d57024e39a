//! Capabilities the catalog needs from the products service.
//!
//! The HTTP implementations live in [`crate::api`]; tests substitute
//! in-memory fakes.

use async_trait::async_trait;

use qorikusi_core::ProductId;

use crate::api::ApiError;
use crate::models::{Category, PageResponse, Product, ProductRequest};

/// Read access to the public catalog.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch every active product, optionally restricted to one category.
    async fn fetch_products(&self, category: Option<&str>) -> Result<Vec<Product>, ApiError>;

    /// Fetch one page of products as paginated by the server.
    async fn fetch_products_page(
        &self,
        page: u32,
        size: u32,
        category: Option<&str>,
    ) -> Result<PageResponse<Product>, ApiError>;

    /// Fetch a single product by id.
    async fn fetch_product(&self, id: ProductId) -> Result<Product, ApiError>;
}

/// Read access to the category list (admin-only endpoint).
#[async_trait]
pub trait CategorySource: Send + Sync {
    async fn fetch_categories(&self) -> Result<Vec<Category>, ApiError>;
}

/// Write access used by the admin product form.
#[async_trait]
pub trait ProductAdmin: Send + Sync {
    async fn create_product(&self, request: &ProductRequest) -> Result<Product, ApiError>;

    async fn update_product(
        &self,
        id: ProductId,
        request: &ProductRequest,
    ) -> Result<Product, ApiError>;
}
