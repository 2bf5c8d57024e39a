//! Observable holder for the in-memory product catalog.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use super::{CatalogSource, FilterCriteria, apply_all};
use crate::api::ApiError;
use crate::models::Product;

/// The current catalog snapshot, shared by everything that renders products.
///
/// A single current value with publish/subscribe semantics: subscribers see
/// every new snapshot, and a refresh that resolves later overwrites one that
/// resolved earlier. Cheap to clone.
#[derive(Clone)]
pub struct CatalogStore {
    tx: Arc<watch::Sender<Arc<Vec<Product>>>>,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_products(Vec::new())
    }

    /// Create a store pre-populated with `products`.
    #[must_use]
    pub fn with_products(products: Vec<Product>) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(products));
        Self { tx: Arc::new(tx) }
    }

    /// The current catalog.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Vec<Product>> {
        Arc::clone(&self.tx.borrow())
    }

    /// Receive every future snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Product>>> {
        self.tx.subscribe()
    }

    /// Replace the current catalog and notify subscribers.
    pub fn publish(&self, products: Vec<Product>) {
        self.tx.send_replace(Arc::new(products));
    }

    /// Fetch the catalog from `source` and publish it.
    ///
    /// On failure the previous snapshot is kept.
    ///
    /// # Errors
    ///
    /// Returns the source's error unchanged.
    #[instrument(skip(self, source))]
    pub async fn refresh(
        &self,
        source: &dyn CatalogSource,
        category: Option<&str>,
    ) -> Result<usize, ApiError> {
        match source.fetch_products(category).await {
            Ok(products) => {
                let count = products.len();
                self.publish(products);
                debug!(count, "Catalog refreshed");
                Ok(count)
            }
            Err(e) => {
                warn!(error = %e, "Catalog refresh failed, keeping previous snapshot");
                Err(e)
            }
        }
    }

    /// Run the query engine over the current snapshot.
    #[must_use]
    pub fn query(&self, criteria: &FilterCriteria) -> Vec<Product> {
        apply_all(criteria, &self.snapshot())
    }
}
