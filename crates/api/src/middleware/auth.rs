//! Session-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::Serialize;
use todo_core::roles::{role_for, ROLE_SUPERUSER};
use todo_core::types::DbId;
use todo_db::repositories::UserRepo;

use crate::auth::jwt::validate_token;
use crate::auth::session::token_from_headers;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user resolved from the session token.
///
/// Use this as an extractor parameter in any handler that requires login.
/// Anonymous requests, bad tokens, and tokens for deleted or deactivated
/// accounts are all rejected with a redirect to the login page.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Html<String>> {
///     tracing::info!(user_id = user.user_id, role = %user.role, "handling request");
///     todo!()
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct AuthUser {
    /// The user's internal database id.
    pub user_id: DbId,
    pub username: String,
    /// Current role name, read from the database on every request.
    pub role: String,
}

impl AuthUser {
    pub fn is_superuser(&self) -> bool {
        self.role == ROLE_SUPERUSER
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let login_required = || AppError::LoginRequired {
            next: parts
                .uri
                .path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or_else(|| parts.uri.path().to_string()),
        };

        let token = token_from_headers(&parts.headers).ok_or_else(login_required)?;

        let claims = validate_token(&token, &state.config.session).map_err(|e| {
            tracing::debug!(error = %e, "Rejected session token");
            login_required()
        })?;

        let user = UserRepo::find_by_id(&state.pool, claims.sub)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(login_required)?;

        Ok(AuthUser {
            user_id: user.id,
            username: user.username,
            role: role_for(user.is_superuser).to_string(),
        })
    }
}
