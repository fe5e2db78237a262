//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO where the entity is editable

pub mod comment;
pub mod todo;
pub mod user;
