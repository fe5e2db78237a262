//! Shared query parameter types for page handlers.

use serde::Deserialize;

/// `?page=` on any paginated page.
///
/// Kept as a raw string: malformed values fall back to the first page
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
}

/// Query parameters of the to-do list (`?q=&page=`).
#[derive(Debug, Default, Deserialize)]
pub struct TodoListParams {
    pub q: Option<String>,
    pub page: Option<String>,
}

/// `?next=` on the login page.
#[derive(Debug, Default, Deserialize)]
pub struct NextParams {
    pub next: Option<String>,
}
