//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and login checks.
//! - [`jwt`] -- signed session token generation and validation.
//! - [`session`] -- the session cookie that carries the token.
//! - [`reset`] -- single-use password reset links.

pub mod jwt;
pub mod password;
pub mod reset;
pub mod session;
