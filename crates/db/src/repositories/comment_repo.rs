//! Repository for the `comments` table.
//!
//! Every returned row is joined with `users` so callers get the author's
//! username alongside the comment.

use sqlx::PgPool;
use todo_core::types::DbId;

use crate::models::comment::{Comment, CreateComment};

/// Select list over `comments c JOIN users u`.
const COLUMNS: &str = "c.id, c.todo_id, c.user_id, u.username AS author, c.message, \
                        c.created_at, c.updated_at";

/// Provides CRUD operations for comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert a new comment, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateComment) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "WITH c AS (
                INSERT INTO comments (todo_id, user_id, message)
                VALUES ($1, $2, $3)
                RETURNING *
             )
             SELECT {COLUMNS} FROM c JOIN users u ON u.id = c.user_id"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(input.todo_id)
            .bind(input.user_id)
            .bind(&input.message)
            .fetch_one(pool)
            .await
    }

    /// Find a comment by ID regardless of owner.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM comments c JOIN users u ON u.id = c.user_id
             WHERE c.id = $1"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Count the comments attached to a to-do item.
    pub async fn count_for_todo(pool: &PgPool, todo_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE todo_id = $1")
            .bind(todo_id)
            .fetch_one(pool)
            .await
    }

    /// List one page of a to-do item's comments, most recent first.
    pub async fn list_for_todo(
        pool: &PgPool,
        todo_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM comments c JOIN users u ON u.id = c.user_id
             WHERE c.todo_id = $1
             ORDER BY c.created_at DESC, c.id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(todo_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Replace a comment's message.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        message: &str,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!(
            "WITH c AS (
                UPDATE comments SET message = $2, updated_at = NOW()
                WHERE id = $1
                RETURNING *
             )
             SELECT {COLUMNS} FROM c JOIN users u ON u.id = c.user_id"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(message)
            .fetch_optional(pool)
            .await
    }

    /// Delete a comment. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
