//! REST clients for the Qorikusi backend services.
//!
//! # Architecture
//!
//! - One [`RestClient`] per service base URL, all sharing a connection pool
//!   and the [`SessionStore`](crate::services::session::SessionStore)
//! - The bearer token is attached to every request except the public
//!   authentication endpoints
//! - Server error bodies (`{code, message}`) become [`ApiError::Server`] with
//!   a user-facing message
//! - Single product lookups are cached via `moka` (5 minute TTL)
//!
//! Requests are single-shot: no retry, no timeout beyond the transport's.

mod auth;
mod catalog;
mod categories;
mod client;
mod error;

pub use auth::{AuthClient, LoginResponse};
pub use catalog::{DEFAULT_FETCH_SIZE, HttpCatalogClient};
pub use categories::CategoryClient;
pub use client::{Access, RestClient, is_public_path};
pub use error::{ApiError, ErrorBody, ServiceKind};
