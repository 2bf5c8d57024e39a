//! Stateful services built on the REST clients.
//!
//! - [`auth`] - Login, registration, password recovery and the current user
//! - [`session`] - Persistence of the user and bearer token

pub mod auth;
pub mod session;
