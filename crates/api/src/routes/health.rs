//! `GET /health`: liveness of the pieces every page depends on.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;
use crate::templates::template_count;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `"ok"` when every page can be served, `"degraded"` otherwise.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database answered `SELECT 1`.
    pub db_healthy: bool,
    /// How many page and mail templates were compiled at startup.
    pub templates_loaded: usize,
    /// Where password reset mail goes: `smtp`, `log` or `memory`.
    pub mail_backend: &'static str,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = todo_db::health_check(&state.pool).await.is_ok();
    let templates_loaded = template_count(&state.templates);

    let status = if db_healthy && templates_loaded > 0 {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        templates_loaded,
        mail_backend: state.mailer.backend(),
    })
}

/// Mount the health check route. It needs no login.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
