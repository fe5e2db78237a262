//! Well-known role names carried in session claims.
//!
//! The `users` table stores a boolean `is_superuser`; these names are what
//! the session token and templates see.

pub const ROLE_SUPERUSER: &str = "superuser";
pub const ROLE_USER: &str = "user";

/// Map the stored superuser flag to its role name.
pub fn role_for(is_superuser: bool) -> &'static str {
    if is_superuser {
        ROLE_SUPERUSER
    } else {
        ROLE_USER
    }
}
