//! Catalog browsing commands.
//!
//! # Environment Variables
//!
//! - `QORIKUSI_PRODUCTS_URL` - Products service base URL
//! - `QORIKUSI_AUTH_URL` - Auth service base URL (required by the shared config)

use clap::Args;
use rust_decimal::Decimal;

use qorikusi_core::Price;
use qorikusi_storefront::catalog::{self, FilterCriteria, SortKey};
use qorikusi_storefront::config::StorefrontConfig;
use qorikusi_storefront::services::session::SessionStore;
use qorikusi_storefront::state::AppState;

use super::CliError;

/// Filters for `catalog list`.
#[derive(Debug, Default, Args)]
pub struct ListArgs {
    /// Case-insensitive text matched against name, description and category
    #[arg(short, long)]
    pub search: Option<String>,

    /// Exact category (case-insensitive)
    #[arg(short, long)]
    pub category: Option<String>,

    /// Lowest price to include
    #[arg(long)]
    pub min_price: Option<Decimal>,

    /// Highest price to include
    #[arg(long)]
    pub max_price: Option<Decimal>,

    /// Lunar energy tag, e.g. "Luna Llena"
    #[arg(short, long)]
    pub energy: Option<String>,

    /// price-asc, price-desc, name-asc or name-desc
    #[arg(long, default_value = "")]
    pub sort: String,

    /// Zero-based page
    #[arg(long, default_value_t = 0)]
    pub page: u32,

    /// Products per page
    #[arg(long, default_value_t = 12)]
    pub size: u32,
}

impl ListArgs {
    /// Translate the flags into query criteria.
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            search: self.search.clone(),
            category: self.category.clone(),
            min_price: self.min_price,
            max_price: self.max_price,
            energy: self.energy.clone(),
            sort: SortKey::parse(&self.sort),
        }
    }
}

async fn load_catalog() -> Result<AppState, CliError> {
    let config = StorefrontConfig::from_env()?;
    let state = AppState::new(config, SessionStore::in_memory());
    let count = state.catalog().refresh(state.catalog_client(), None).await?;
    tracing::debug!(count, "Catalog loaded");
    Ok(state)
}

/// List products matching the filters, one page at a time.
///
/// # Errors
///
/// Returns an error if configuration is missing or the products service
/// cannot be reached.
pub async fn list(args: &ListArgs) -> Result<(), CliError> {
    let state = load_catalog().await?;
    let currency = state.config().currency;

    let matches = state.catalog().query(&args.criteria());
    let page = catalog::paginate(&matches, args.page, args.size);

    if page.content.is_empty() {
        tracing::info!("No products match these filters");
        return Ok(());
    }

    for product in &page.content {
        tracing::info!(
            id = %product.id,
            category = %product.category,
            energy = product.energy.as_deref().unwrap_or("-"),
            stock = product.stock,
            "{} {}",
            product.name,
            Price::new(product.price, currency),
        );
    }

    tracing::info!(
        "Page {} of {} ({} products)",
        page.number + 1,
        page.total_pages,
        page.total_elements
    );
    Ok(())
}

/// List the distinct categories present in the catalog.
///
/// # Errors
///
/// Same as [`list`].
pub async fn categories() -> Result<(), CliError> {
    let state = load_catalog().await?;
    let names = catalog::categories_from_products(&state.catalog().snapshot());

    if names.is_empty() {
        tracing::info!("The catalog has no categories");
    }
    for name in names {
        tracing::info!("{name}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_list_args_to_criteria() {
        let args = ListArgs {
            search: Some("luna".to_string()),
            min_price: Some(dec!(100)),
            sort: "price-desc".to_string(),
            ..ListArgs::default()
        };

        let criteria = args.criteria();
        assert_eq!(criteria.search.as_deref(), Some("luna"));
        assert_eq!(criteria.min_price, Some(dec!(100)));
        assert_eq!(criteria.max_price, None);
        assert_eq!(criteria.sort, SortKey::PriceDesc);
    }

    #[test]
    fn test_unknown_sort_keeps_order() {
        let args = ListArgs {
            sort: "popularity".to_string(),
            ..ListArgs::default()
        };
        assert_eq!(args.criteria().sort, SortKey::None);
        assert!(args.criteria().is_empty());
    }
}
