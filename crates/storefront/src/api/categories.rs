//! Category list client.

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::{ApiError, RestClient};
use crate::catalog::CategorySource;
use crate::models::Category;

const CATEGORIES_PATH: &str = "admin/categories";

/// HTTP implementation of [`CategorySource`].
///
/// The endpoint is admin-only, so the session must hold an admin token.
#[derive(Clone)]
pub struct CategoryClient {
    rest: RestClient,
}

impl CategoryClient {
    #[must_use]
    pub const fn new(rest: RestClient) -> Self {
        Self { rest }
    }
}

#[async_trait]
impl CategorySource for CategoryClient {
    #[instrument(skip(self))]
    async fn fetch_categories(&self) -> Result<Vec<Category>, ApiError> {
        let categories: Vec<Category> = self.rest.get(CATEGORIES_PATH, &[]).await?;
        debug!(count = categories.len(), "Fetched categories");
        Ok(categories)
    }
}
