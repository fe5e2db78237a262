//! Repository for the `todos` table.

use sqlx::PgPool;
use todo_core::types::DbId;

use crate::models::todo::{CreateTodo, Todo, TodoFilter, UpdateTodo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, title, description, start_date, end_date, \
                        is_completed, created_at, updated_at";

/// `WHERE` clause shared by the count and list queries.
///
/// `$1` is the optional owner id, `$2` the optional escaped `ILIKE` pattern.
const FILTER: &str = "($1::BIGINT IS NULL OR user_id = $1)
                      AND ($2::TEXT IS NULL OR title ILIKE $2 OR description ILIKE $2)";

/// Provides CRUD operations for to-do items.
pub struct TodoRepo;

impl TodoRepo {
    /// Insert a new item owned by `user_id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateTodo,
    ) -> Result<Todo, sqlx::Error> {
        let query = format!(
            "INSERT INTO todos (user_id, title, description, start_date, end_date)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Todo>(&query)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_one(pool)
            .await
    }

    /// Find an item by ID regardless of owner.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Todo>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM todos WHERE id = $1");
        sqlx::query_as::<_, Todo>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Count the items matching `filter`.
    pub async fn count_visible(pool: &PgPool, filter: &TodoFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM todos WHERE {FILTER}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(filter.owner_id)
            .bind(filter.pattern.as_deref())
            .fetch_one(pool)
            .await
    }

    /// List one page of items matching `filter`, newest first.
    pub async fn list_visible(
        pool: &PgPool,
        filter: &TodoFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Todo>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM todos
             WHERE {FILTER}
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Todo>(&query)
            .bind(filter.owner_id)
            .bind(filter.pattern.as_deref())
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Replace the editable fields of an item.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTodo,
    ) -> Result<Option<Todo>, sqlx::Error> {
        let query = format!(
            "UPDATE todos SET
                title = $2,
                description = $3,
                start_date = $4,
                end_date = $5,
                is_completed = $6,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Todo>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.is_completed)
            .fetch_optional(pool)
            .await
    }

    /// Delete an item and, through the foreign key, its comments.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
