use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use todo_core::error::CoreError;

use crate::routes::LOGIN_PATH;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce a small HTML error page, or a
/// redirect to the login page for anonymous visitors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `todo_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A template failed to render.
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    /// The page needs a logged-in user; `next` is where to return after login.
    #[error("Login required for {next}")]
    LoginRequired { next: String },

    /// The URL names no record, e.g. a non-numeric id segment.
    #[error("No page at {0}")]
    PageNotFound(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Shorthand for the "not found" outcome of a missing or hidden record.
pub fn not_found(entity: &'static str, id: i64) -> AppError {
    AppError::Core(CoreError::NotFound { entity, id })
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::LoginRequired { next } => {
                let query = serde_urlencoded::to_string([("next", next.as_str())])
                    .unwrap_or_default();
                return Redirect::to(&format!("{LOGIN_PATH}?{query}")).into_response();
            }

            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Rendering / HTTP-specific errors ---
            AppError::PageNotFound(_) => (StatusCode::NOT_FOUND, "Page not found".to_string()),
            AppError::Template(err) => {
                tracing::error!(error = ?err, "Template rendering failed");
                internal()
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        (status, Html(error_page(status, &message))).into_response()
    }
}

fn internal() -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "An internal error occurred".to_string(),
    )
}

/// Minimal standalone page; it must render even when templates are broken.
fn error_page(status: StatusCode, message: &str) -> String {
    let title = status.canonical_reason().unwrap_or("Error");
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{code} {title}</title></head>\
         <body><h1>{code} {title}</h1><p>{message}</p><p><a href=\"/todo/\">Back to list</a></p>\
         </body></html>\n",
        code = status.as_u16(),
        message = tera::escape_html(message),
    )
}

/// Classify a sqlx error into an HTTP status and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, String) {
    match err {
        sqlx::Error::RowNotFound => (StatusCode::NOT_FOUND, "Resource not found".to_string()),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}

/// Whether `err` is a unique violation on the named constraint.
pub fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505") && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use axum::http::header::LOCATION;

    #[test]
    fn not_found_renders_404_page() {
        let response = not_found("Todo", 9).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unknown_page_is_404() {
        let response = AppError::PageNotFound("/todo/abc/".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn login_required_redirects_with_encoded_next() {
        let response = AppError::LoginRequired {
            next: "/todo/?q=a b".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers().get(LOCATION).unwrap().to_str().unwrap();
        assert_eq!(location, "/accounts/login/?next=%2Ftodo%2F%3Fq%3Da+b");
    }

    #[test]
    fn row_not_found_is_404() {
        let response = AppError::Database(sqlx::Error::RowNotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_details_are_hidden() {
        let (status, message) = internal();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!message.contains("secret"));
        let response = AppError::InternalError("secret detail".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_page_escapes_message() {
        let page = error_page(StatusCode::BAD_REQUEST, "<script>");
        assert!(page.contains("&lt;script&gt;"));
        assert!(page.contains("400 Bad Request"));
    }

    #[test]
    fn unique_violation_check_ignores_other_errors() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound, "uq_users_username"));
        assert_matches!(
            AppError::from(CoreError::Conflict("x".into())),
            AppError::Core(CoreError::Conflict(_))
        );
    }
}
