//! To-do item entity model and DTOs.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;
use todo_core::todo::CleanTodo;
use todo_core::types::{DbId, Timestamp};

/// A row from the `todos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Todo {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_completed: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a to-do item. The owner is passed separately.
#[derive(Debug, Clone)]
pub struct CreateTodo {
    pub title: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// DTO for a full update from the edit form.
#[derive(Debug, Clone)]
pub struct UpdateTodo {
    pub title: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_completed: bool,
}

impl From<CleanTodo> for CreateTodo {
    fn from(clean: CleanTodo) -> Self {
        Self {
            title: clean.title,
            description: clean.description,
            start_date: clean.start_date,
            end_date: clean.end_date,
        }
    }
}

impl UpdateTodo {
    pub fn from_clean(clean: CleanTodo, is_completed: bool) -> Self {
        Self {
            title: clean.title,
            description: clean.description,
            start_date: clean.start_date,
            end_date: clean.end_date,
            is_completed,
        }
    }
}

/// Filters for the paginated list query.
#[derive(Debug, Clone, Default)]
pub struct TodoFilter {
    /// Restrict to one owner; `None` lists every owner's items.
    pub owner_id: Option<DbId>,
    /// Escaped `ILIKE` pattern matched against title and description.
    pub pattern: Option<String>,
}
