//! Domain models for the storefront.
//!
//! - [`product`] - Catalog products, categories and the paginated envelope
//! - [`user`] - The authenticated session user

pub mod product;
pub mod user;

pub use product::{Category, PageResponse, Product, ProductRequest};
pub use user::SessionUser;
