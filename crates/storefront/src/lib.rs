//! Qorikusi storefront library.
//!
//! Catalog browsing, cart, checkout and authentication for the Qorikusi
//! jewelry store, backed by its REST microservices. Front ends (the `qk` CLI,
//! tests) drive everything through [`state::AppState`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod validation;
