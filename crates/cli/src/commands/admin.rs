//! Admin commands.
//!
//! # Usage
//!
//! ```bash
//! QORIKUSI_ADMIN_PASSWORD=... qk admin categories -u admin@qorikusi.pe
//! ```
//!
//! # Environment Variables
//!
//! - `QORIKUSI_AUTH_URL` - Auth service base URL
//! - `QORIKUSI_PRODUCTS_URL` - Products service base URL
//! - `QORIKUSI_ADMIN_USER` / `QORIKUSI_ADMIN_PASSWORD` - Credentials

use qorikusi_storefront::catalog::CategorySource;
use qorikusi_storefront::config::StorefrontConfig;
use qorikusi_storefront::services::session::SessionStore;
use qorikusi_storefront::state::AppState;

use super::CliError;

/// Log in as an administrator and list category records.
///
/// # Errors
///
/// Returns an error if login fails, the account is not an admin, or the
/// categories endpoint rejects the request.
pub async fn categories(user: &str, password: &str) -> Result<(), CliError> {
    let config = StorefrontConfig::from_env()?;
    let state = AppState::new(config, SessionStore::in_memory());

    let session = state.auth().login(user, password).await?;
    if !session.is_admin() {
        state.auth().logout();
        return Err(CliError::NotAdmin(session.email));
    }

    let result = state.categories().fetch_categories().await;
    state.auth().logout();

    let categories = result?;
    if categories.is_empty() {
        tracing::info!("No categories found");
    }
    for category in &categories {
        tracing::info!(
            id = %category.uuid,
            description = category.descripcion.as_deref().unwrap_or(""),
            "{}",
            category.nombre
        );
    }
    Ok(())
}
