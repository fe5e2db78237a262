//! To-do web application library.
//!
//! Exposes the core building blocks (config, state, error handling,
//! templates, routes) so integration tests and the binaries can both
//! access them.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod mail;
pub mod middleware;
pub mod query;
pub mod router;
pub mod routes;
pub mod state;
pub mod templates;
