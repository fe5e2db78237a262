//! Domain rules for the to-do application.
//!
//! Nothing in this crate performs I/O: it holds the error type, id and
//! timestamp aliases, the ownership rule, form validation, pagination and
//! search-pattern helpers shared by the `db` and `api` crates.

pub mod access;
pub mod account;
pub mod comment;
pub mod error;
pub mod forms;
pub mod pagination;
pub mod roles;
pub mod search;
pub mod todo;
pub mod types;
