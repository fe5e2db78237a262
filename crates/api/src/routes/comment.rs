//! Route definitions for the `/comment` pages.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::comment;
use crate::state::AppState;

/// Routes under `/comment/`.
///
/// ```text
/// GET    /{id}/update/     -> comment_update_form
/// POST   /{id}/update/     -> comment_update
/// POST   /{id}/delete/     -> comment_delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/comment/{id}/update/",
            get(comment::comment_update_form).post(comment::comment_update),
        )
        .route("/comment/{id}/delete/", post(comment::comment_delete))
}
