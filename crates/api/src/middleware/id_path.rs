//! Record id taken from the URL path.

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use todo_core::types::DbId;

use crate::error::AppError;

/// The single `{id}` segment of a record URL such as `/todo/{id}/`.
///
/// A segment that is not a number, or does not fit a [`DbId`], names no
/// record, so the request is answered with 404 instead of axum's
/// plain-text 400.
///
/// ```ignore
/// async fn show(user: AuthUser, IdPath(todo_id): IdPath) -> AppResult<Response> {
///     todo!()
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdPath(pub DbId);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<DbId>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(IdPath(id)),
            Err(rejection) => {
                tracing::debug!(path = %parts.uri.path(), error = %rejection, "Unusable record id");
                Err(AppError::PageNotFound(parts.uri.path().to_string()))
            }
        }
    }
}
