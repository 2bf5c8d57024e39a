//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `QORIKUSI_AUTH_URL` - Auth service base URL
//! - `QORIKUSI_PRODUCTS_URL` - Products service base URL
//!
//! ## Optional
//! - `QORIKUSI_CART_URL` - Cart service base URL
//! - `QORIKUSI_CUSTOMER_URL` - Customer service base URL
//! - `QORIKUSI_FREE_SHIPPING_THRESHOLD` - Subtotal for free shipping (default: 250)
//! - `QORIKUSI_FLAT_SHIPPING_COST` - Shipping fee below the threshold (default: 15)
//! - `QORIKUSI_CURRENCY` - Display currency (default: PEN)
//! - `QORIKUSI_CATALOG_FETCH_SIZE` - Page size for full catalog loads (default: 1000)
//! - `QORIKUSI_ORDER_DELAY_MS` - Simulated order processing delay (default: 1000)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use qorikusi_core::CurrencyCode;

use crate::checkout::ShippingPolicy;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend service URLs
    pub services: ServiceUrls,
    /// Shipping fee rules
    pub shipping: ShippingPolicy,
    /// Currency used when displaying prices
    pub currency: CurrencyCode,
    /// Page size for loading the whole catalog at once
    pub catalog_fetch_size: u32,
    /// Simulated order processing delay
    pub order_delay: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Base URLs of the Qorikusi microservices.
#[derive(Debug, Clone)]
pub struct ServiceUrls {
    pub auth: Url,
    pub products: Url,
    pub cart: Option<Url>,
    pub customer: Option<Url>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or any value
    /// fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let services = ServiceUrls {
            auth: env.required_url("QORIKUSI_AUTH_URL")?,
            products: env.required_url("QORIKUSI_PRODUCTS_URL")?,
            cart: env.optional_url("QORIKUSI_CART_URL")?,
            customer: env.optional_url("QORIKUSI_CUSTOMER_URL")?,
        };

        let defaults = ShippingPolicy::default();
        let shipping = ShippingPolicy::new(
            env.parsed_or(
                "QORIKUSI_FREE_SHIPPING_THRESHOLD",
                defaults.free_shipping_threshold,
            )?,
            env.parsed_or("QORIKUSI_FLAT_SHIPPING_COST", defaults.flat_shipping_cost)?,
        );
        for (key, value) in [
            ("QORIKUSI_FREE_SHIPPING_THRESHOLD", shipping.free_shipping_threshold),
            ("QORIKUSI_FLAT_SHIPPING_COST", shipping.flat_shipping_cost),
        ] {
            if value.is_sign_negative() {
                return Err(ConfigError::InvalidEnvVar(
                    key.to_string(),
                    "must not be negative".to_string(),
                ));
            }
        }

        let currency = env.parsed_or("QORIKUSI_CURRENCY", CurrencyCode::default())?;
        let catalog_fetch_size = env.parsed_or(
            "QORIKUSI_CATALOG_FETCH_SIZE",
            crate::api::DEFAULT_FETCH_SIZE,
        )?;
        if catalog_fetch_size == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "QORIKUSI_CATALOG_FETCH_SIZE".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        let order_delay = Duration::from_millis(env.parsed_or("QORIKUSI_ORDER_DELAY_MS", 1000_u64)?);
        let sentry_dsn = env.optional("SENTRY_DSN");

        Ok(Self {
            services,
            shipping,
            currency,
            catalog_fetch_size,
            order_delay,
            sentry_dsn,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a, F: Fn(&str) -> Option<String>>(&'a F);

impl<F: Fn(&str) -> Option<String>> Env<'_, F> {
    /// Get an optional variable. Empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    fn parsed_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |value| {
            value
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }

    fn required_url(&self, key: &str) -> Result<Url, ConfigError> {
        parse_service_url(key, &self.required(key)?)
    }

    fn optional_url(&self, key: &str) -> Result<Option<Url>, ConfigError> {
        self.optional(key)
            .map(|value| parse_service_url(key, &value))
            .transpose()
    }
}

/// Parse a service base URL; only http(s) is accepted.
fn parse_service_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}
