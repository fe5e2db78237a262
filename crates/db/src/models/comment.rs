//! Comment entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use todo_core::types::{DbId, Timestamp};

/// A comment row joined with its author's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub todo_id: DbId,
    pub user_id: DbId,
    pub author: String,
    pub message: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a comment.
#[derive(Debug, Clone)]
pub struct CreateComment {
    pub todo_id: DbId,
    pub user_id: DbId,
    pub message: String,
}
