//! Route definitions for the `/accounts` pages.
//!
//! Signup, login, logout and password reset are public; password change
//! requires login.

use axum::routing::get;
use axum::Router;

use crate::handlers::accounts;
use crate::state::AppState;

/// Routes under `/accounts/`.
///
/// ```text
/// GET    /signup/                 -> signup_form
/// POST   /signup/                 -> signup
/// GET    /login/                  -> login_form
/// POST   /login/                  -> login
/// GET    /logout/                 -> logout
/// POST   /logout/                 -> logout
/// GET    /password_change/        -> password_change_form
/// POST   /password_change/        -> password_change
/// GET    /password_change/done/   -> password_change_done
/// GET    /password_reset/         -> password_reset_form
/// POST   /password_reset/         -> password_reset
/// GET    /password_reset/done/    -> password_reset_done
/// GET    /reset/{uidb64}/{token}/ -> password_reset_confirm_form
/// POST   /reset/{uidb64}/{token}/ -> password_reset_confirm
/// GET    /reset/done/             -> password_reset_complete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/accounts/signup/", get(accounts::signup_form).post(accounts::signup))
        .route("/accounts/login/", get(accounts::login_form).post(accounts::login))
        .route("/accounts/logout/", get(accounts::logout).post(accounts::logout))
        .route(
            "/accounts/password_change/",
            get(accounts::password_change_form).post(accounts::password_change),
        )
        .route(
            "/accounts/password_change/done/",
            get(accounts::password_change_done),
        )
        .route(
            "/accounts/password_reset/",
            get(accounts::password_reset_form).post(accounts::password_reset),
        )
        .route(
            "/accounts/password_reset/done/",
            get(accounts::password_reset_done),
        )
        .route(
            "/accounts/reset/{uidb64}/{token}/",
            get(accounts::password_reset_confirm_form).post(accounts::password_reset_confirm),
        )
        .route("/accounts/reset/done/", get(accounts::password_reset_complete))
}
