//! Products service client.
//!
//! Public catalog reads go through `catalog/products`; admin writes through
//! `admin/products`. Single product lookups are cached for 5 minutes.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::{debug, instrument};

use qorikusi_core::ProductId;

use super::{ApiError, RestClient};
use crate::catalog::{CatalogSource, ProductAdmin};
use crate::models::{PageResponse, Product, ProductRequest};

const CATALOG_PATH: &str = "catalog/products";
const ADMIN_PATH: &str = "admin/products";

/// Page size used when loading the whole catalog in one request.
pub const DEFAULT_FETCH_SIZE: u32 = 1000;

/// HTTP implementation of [`CatalogSource`] and [`ProductAdmin`].
#[derive(Clone)]
pub struct HttpCatalogClient {
    rest: RestClient,
    fetch_size: u32,
    cache: Cache<ProductId, Product>,
}

impl HttpCatalogClient {
    #[must_use]
    pub fn new(rest: RestClient) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            rest,
            fetch_size: DEFAULT_FETCH_SIZE,
            cache,
        }
    }

    /// Override the page size used by [`CatalogSource::fetch_products`].
    #[must_use]
    pub const fn with_fetch_size(mut self, fetch_size: u32) -> Self {
        self.fetch_size = fetch_size;
        self
    }

    async fn page(
        &self,
        page: u32,
        size: u32,
        category: Option<&str>,
    ) -> Result<PageResponse<Product>, ApiError> {
        let mut query = vec![("page", page.to_string()), ("size", size.to_string())];
        if let Some(category) = category.filter(|c| !c.is_empty()) {
            query.push(("categoria", category.to_string()));
        }
        self.rest.get(CATALOG_PATH, &query).await
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogClient {
    #[instrument(skip(self))]
    async fn fetch_products(&self, category: Option<&str>) -> Result<Vec<Product>, ApiError> {
        let page = self.page(0, self.fetch_size, category).await?;
        debug!(
            count = page.content.len(),
            total = page.total_elements,
            "Fetched catalog"
        );
        Ok(page.content)
    }

    #[instrument(skip(self))]
    async fn fetch_products_page(
        &self,
        page: u32,
        size: u32,
        category: Option<&str>,
    ) -> Result<PageResponse<Product>, ApiError> {
        self.page(page, size, category).await
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn fetch_product(&self, id: ProductId) -> Result<Product, ApiError> {
        if let Some(product) = self.cache.get(&id).await {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let product: Product = self
            .rest
            .get(&format!("{CATALOG_PATH}/{id}"), &[])
            .await
            .map_err(|e| product_not_found(id, e))?;

        self.cache.insert(id, product.clone()).await;
        Ok(product)
    }
}

/// A bare 404 becomes `NotFound`; coded errors keep the service's message.
fn product_not_found(id: ProductId, error: ApiError) -> ApiError {
    if error.status() == Some(404) && error.code().is_none() {
        ApiError::NotFound(format!("Product not found: {id}"))
    } else {
        error
    }
}

#[async_trait]
impl ProductAdmin for HttpCatalogClient {
    #[instrument(skip(self, request), fields(name = %request.nombre))]
    async fn create_product(&self, request: &ProductRequest) -> Result<Product, ApiError> {
        let product: Product = self
            .rest
            .post(ADMIN_PATH, request, super::Access::Authenticated)
            .await?;
        debug!(product_id = %product.id, "Product created");
        Ok(product)
    }

    #[instrument(skip(self, request), fields(product_id = %id))]
    async fn update_product(
        &self,
        id: ProductId,
        request: &ProductRequest,
    ) -> Result<Product, ApiError> {
        let product: Product = self.rest.put(&format!("{ADMIN_PATH}/{id}"), request).await?;
        self.cache.invalidate(&id).await;
        debug!("Product updated");
        Ok(product)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::ServiceKind;
    use crate::services::session::{MemoryStore, SessionStore};

    fn client() -> HttpCatalogClient {
        let rest = RestClient::new(
            url::Url::parse("https://products.qorikusi.pe").unwrap(),
            ServiceKind::Products,
            SessionStore::new(Arc::new(MemoryStore::default())),
        );
        HttpCatalogClient::new(rest)
    }

    #[test]
    fn test_default_fetch_size() {
        assert_eq!(client().fetch_size, 1000);
        assert_eq!(client().with_fetch_size(50).fetch_size, 50);
    }

    #[test]
    fn test_product_url() {
        let id = ProductId::random();
        let url = client().rest.url(&format!("{CATALOG_PATH}/{id}")).unwrap();
        assert_eq!(
            url.as_str(),
            format!("https://products.qorikusi.pe/catalog/products/{id}")
        );
    }

    #[test]
    fn test_only_uncoded_404_becomes_not_found() {
        let id = ProductId::random();

        let bare = ApiError::from_response(ServiceKind::Products, 404, "");
        assert!(matches!(product_not_found(id, bare), ApiError::NotFound(_)));

        let coded = ApiError::from_response(
            ServiceKind::Products,
            404,
            r#"{"code":"PRODUCT_NOT_FOUND"}"#,
        );
        let kept = product_not_found(id, coded);
        assert_eq!(kept.code(), Some("PRODUCT_NOT_FOUND"));
        assert_eq!(kept.status(), Some(404));

        let other = ApiError::from_response(ServiceKind::Products, 500, "");
        assert_eq!(product_not_found(id, other).status(), Some(500));
    }
}
