//! Route definitions for the `/todo` pages.
//!
//! All pages require login.

use axum::routing::get;
use axum::Router;

use crate::handlers::todo;
use crate::state::AppState;

/// Routes under `/todo/`.
///
/// ```text
/// GET    /                 -> todo_list
/// GET    /create/          -> todo_create_form
/// POST   /create/          -> todo_create
/// GET    /{id}/            -> todo_info
/// POST   /{id}/            -> add_comment
/// GET    /{id}/update/     -> todo_update_form
/// POST   /{id}/update/     -> todo_update
/// GET    /{id}/delete/     -> todo_delete_confirm
/// POST   /{id}/delete/     -> todo_delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/todo/", get(todo::todo_list))
        .route(
            "/todo/create/",
            get(todo::todo_create_form).post(todo::todo_create),
        )
        .route("/todo/{id}/", get(todo::todo_info).post(todo::add_comment))
        .route(
            "/todo/{id}/update/",
            get(todo::todo_update_form).post(todo::todo_update),
        )
        .route(
            "/todo/{id}/delete/",
            get(todo::todo_delete_confirm).post(todo::todo_delete),
        )
}
