//! Vitrine Storefront library.
//!
//! The cart store, its persistence, the upstream API clients and the JSON
//! API, exposed as a library so the server binary, the CLI and the
//! integration tests share one implementation.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod middleware;
pub mod orders;
pub mod routes;
pub mod session;
pub mod state;
pub mod storage;
