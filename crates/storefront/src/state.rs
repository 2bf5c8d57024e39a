//! Application state shared by storefront front ends.

use std::sync::Arc;

use crate::api::{AuthClient, CategoryClient, HttpCatalogClient, RestClient, ServiceKind};
use crate::catalog::CatalogStore;
use crate::checkout::{CheckoutService, SimulatedOrderProcessor};
use crate::config::StorefrontConfig;
use crate::services::auth::AuthService;
use crate::services::session::SessionStore;

/// Everything a front end needs, wired from one [`StorefrontConfig`].
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    session: SessionStore,
    catalog_client: HttpCatalogClient,
    categories: CategoryClient,
    catalog: CatalogStore,
    auth: AuthService,
    checkout: CheckoutService,
}

impl AppState {
    /// Create the clients and services.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `session` - Where the user and bearer token are persisted
    #[must_use]
    pub fn new(config: StorefrontConfig, session: SessionStore) -> Self {
        let products = RestClient::new(
            config.services.products.clone(),
            ServiceKind::Products,
            session.clone(),
        );
        let categories_rest =
            products.for_service(config.services.products.clone(), ServiceKind::Categories);
        let auth_rest = products.for_service(config.services.auth.clone(), ServiceKind::Auth);

        let catalog_client =
            HttpCatalogClient::new(products).with_fetch_size(config.catalog_fetch_size);
        let auth = AuthService::new(Arc::new(AuthClient::new(auth_rest)), session.clone());
        let checkout =
            CheckoutService::new(Arc::new(SimulatedOrderProcessor::new(config.order_delay)));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                session,
                catalog_client,
                categories: CategoryClient::new(categories_rest),
                catalog: CatalogStore::new(),
                auth,
                checkout,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// The products service client (catalog reads and admin writes).
    #[must_use]
    pub fn catalog_client(&self) -> &HttpCatalogClient {
        &self.inner.catalog_client
    }

    #[must_use]
    pub fn categories(&self) -> &CategoryClient {
        &self.inner.categories
    }

    /// The shared catalog snapshot.
    #[must_use]
    pub fn catalog(&self) -> &CatalogStore {
        &self.inner.catalog
    }

    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    #[must_use]
    pub fn checkout(&self) -> &CheckoutService {
        &self.inner.checkout
    }
}
