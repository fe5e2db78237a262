pub mod accounts;
pub mod comment;
pub mod health;
pub mod todo;

use axum::response::Redirect;
use axum::routing::get;
use axum::Router;

use crate::state::AppState;

/// Where anonymous visitors are sent to log in.
pub const LOGIN_PATH: &str = "/accounts/login/";

/// Build the page route tree.
///
/// Route hierarchy:
///
/// ```text
/// /                                   redirect to /todo/
///
/// /todo/                              list (search, pagination)
/// /todo/create/                       create form
/// /todo/{id}/                         detail + comments, post a comment
/// /todo/{id}/update/                  update form
/// /todo/{id}/delete/                  confirm, delete
///
/// /comment/{id}/update/               edit a comment
/// /comment/{id}/delete/               delete a comment
///
/// /accounts/signup/                   signup (public)
/// /accounts/login/                    login (public)
/// /accounts/logout/                   logout
/// /accounts/password_change/          change password
/// /accounts/password_change/done/     confirmation
/// /accounts/password_reset/           request a reset link (public)
/// /accounts/password_reset/done/      "check your mail"
/// /accounts/reset/{uidb64}/{token}/   choose a new password
/// /accounts/reset/done/               confirmation
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/todo/") }))
        .merge(todo::router())
        .merge(comment::router())
        .merge(accounts::router())
}
