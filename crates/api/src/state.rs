use std::sync::Arc;

use tera::Tera;

use crate::config::ServerConfig;
use crate::mail::Mailer;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: todo_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Compiled HTML templates.
    pub templates: Arc<Tera>,
    /// Outgoing mail (password reset links).
    pub mailer: Mailer,
}
