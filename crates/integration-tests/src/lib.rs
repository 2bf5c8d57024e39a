//! Integration tests for the Qorikusi storefront core.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p qorikusi-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog_query` - Query engine and catalog store
//! - `checkout_flow` - Cart to confirmed order
//! - `auth_session` - Login, persisted session, logout
//!
//! No backend is needed: the service traits are backed by the in-memory
//! fakes in this crate.

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use secrecy::SecretString;

use qorikusi_core::{ProductId, UserRole};
use qorikusi_storefront::api::{ApiError, LoginResponse, ServiceKind};
use qorikusi_storefront::catalog::CatalogSource;
use qorikusi_storefront::checkout::{
    CheckoutError, OrderProcessor, OrderSummary, PaymentDetails, ShippingDetails,
};
use qorikusi_storefront::models::{PageResponse, Product};
use qorikusi_storefront::services::auth::AuthBackend;

// =============================================================================
// Fixtures
// =============================================================================

/// A product with the fields the query engine looks at.
#[must_use]
pub fn product(name: &str, price: Decimal, category: &str, energy: Option<&str>) -> Product {
    Product {
        id: ProductId::random(),
        name: name.to_string(),
        description: format!("{name} artesanal"),
        price,
        category: category.to_string(),
        energy: energy.map(str::to_string),
        stock: 5,
        image: String::new(),
    }
}

/// A small catalog spanning every category, tag and price band used in tests.
#[must_use]
pub fn sample_catalog() -> Vec<Product> {
    vec![
        product("Collar Luna", dec!(180), "Collares", Some("Luna Llena")),
        product("Anillo Sol", dec!(95.50), "Anillos", Some("Luna Nueva")),
        product("Pulsera Estrella", dec!(60), "Pulseras", None),
        product("Aretes Plata", dec!(120), "Aretes", Some("Cuarto Creciente")),
        product("Collar Ámbar", dec!(250), "Collares", Some("luna llena")),
        product("Anillo Cobre", dec!(45), "Anillos", None),
    ]
}

#[must_use]
pub fn valid_shipping() -> ShippingDetails {
    ShippingDetails {
        first_name: "Killa".to_string(),
        last_name: "Quispe".to_string(),
        email: "killa@qorikusi.pe".to_string(),
        phone: "987654321".to_string(),
        address: "Av. El Sol 123".to_string(),
        city: "Cusco".to_string(),
        ..ShippingDetails::default()
    }
}

#[must_use]
pub fn valid_card() -> PaymentDetails {
    PaymentDetails {
        card_name: "KILLA QUISPE".to_string(),
        card_number: "4242424242424242".to_string(),
        expiry_date: "12/29".to_string(),
        cvv: "123".to_string(),
    }
}

// =============================================================================
// Fakes
// =============================================================================

/// Serves a fixed product list, or fails every call.
pub struct FixedCatalog {
    products: Vec<Product>,
    fail: bool,
}

impl FixedCatalog {
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            fail: false,
        }
    }

    #[must_use]
    pub const fn failing() -> Self {
        Self {
            products: Vec::new(),
            fail: true,
        }
    }

    fn check(&self) -> Result<(), ApiError> {
        if self.fail {
            Err(ApiError::server(503, None, Some(ServiceKind::Products)))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CatalogSource for FixedCatalog {
    async fn fetch_products(&self, category: Option<&str>) -> Result<Vec<Product>, ApiError> {
        self.check()?;
        Ok(self
            .products
            .iter()
            .filter(|p| category.is_none_or(|c| p.category.eq_ignore_ascii_case(c)))
            .cloned()
            .collect())
    }

    async fn fetch_products_page(
        &self,
        page: u32,
        size: u32,
        category: Option<&str>,
    ) -> Result<PageResponse<Product>, ApiError> {
        let products = self.fetch_products(category).await?;
        Ok(qorikusi_storefront::catalog::paginate(&products, page, size))
    }

    async fn fetch_product(&self, id: ProductId) -> Result<Product, ApiError> {
        self.check()?;
        self.products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(id.to_string()))
    }
}

/// Auth backend with one admin and one client account.
///
/// Both accounts use the password `qorikusi`.
#[derive(Default)]
pub struct FakeAuthBackend {
    pub calls: Mutex<Vec<String>>,
}

pub const ADMIN_USER: &str = "admin@qorikusi.pe";
pub const CLIENT_USER: &str = "killa@qorikusi.pe";
pub const PASSWORD: &str = "qorikusi";

impl FakeAuthBackend {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthBackend for FakeAuthBackend {
    async fn login(&self, username_or_email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        self.record(format!("login:{username_or_email}"));
        let roles = match username_or_email {
            ADMIN_USER => vec![UserRole::Admin],
            CLIENT_USER => vec![UserRole::Client],
            _ => Vec::new(),
        };
        if roles.is_empty() || password != PASSWORD {
            return Err(ApiError::from_response(
                ServiceKind::Auth,
                401,
                r#"{"code":"INVALID_CREDENTIALS","message":"Bad credentials"}"#,
            ));
        }
        Ok(LoginResponse {
            access_token: SecretString::from(format!("jwt-{username_or_email}")),
            roles,
        })
    }

    async fn register_client(&self, email: &str, _password: &str) -> Result<(), ApiError> {
        self.record(format!("register:{email}"));
        if email == CLIENT_USER {
            return Err(ApiError::from_response(
                ServiceKind::Auth,
                409,
                r#"{"code":"EMAIL_ALREADY_EXISTS"}"#,
            ));
        }
        Ok(())
    }

    async fn forgot_password(&self, email: &str) -> Result<(), ApiError> {
        self.record(format!("forgot:{email}"));
        Ok(())
    }

    async fn reset_password(&self, token: &str, _new_password: &str) -> Result<(), ApiError> {
        self.record(format!("reset:{token}"));
        if token == "expired" {
            return Err(ApiError::from_response(
                ServiceKind::Auth,
                400,
                r#"{"code":"TOKEN_EXPIRED"}"#,
            ));
        }
        Ok(())
    }
}

/// Order processor that rejects every order.
pub struct DecliningProcessor;

#[async_trait]
impl OrderProcessor for DecliningProcessor {
    async fn process(&self, _order: &OrderSummary) -> Result<(), CheckoutError> {
        Err(CheckoutError::Processing("card declined".to_string()))
    }
}
