//! Request extractors.
//!
//! - [`auth::AuthUser`] -- The logged-in user, or a redirect to the login page.
//! - [`id_path::IdPath`] -- A numeric record id from the URL, or 404.

pub mod auth;
pub mod id_path;
