//! Handlers for editing and removing comments.
//!
//! Only the comment's author or a superuser may touch a comment; anyone
//! else gets 404.

use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use todo_core::access::can_access;
use todo_core::comment::CommentForm;
use todo_core::forms::FormErrors;
use todo_core::types::DbId;
use todo_db::models::comment::Comment;
use todo_db::repositories::CommentRepo;

use crate::error::{not_found, AppResult};
use crate::handlers::todo::detail_url;
use crate::middleware::auth::AuthUser;
use crate::middleware::id_path::IdPath;
use crate::state::AppState;
use crate::templates::{base_context, render};

async fn find_and_authorize(
    pool: &sqlx::PgPool,
    comment_id: DbId,
    auth: &AuthUser,
) -> AppResult<Comment> {
    let comment = CommentRepo::find_by_id(pool, comment_id)
        .await?
        .ok_or_else(|| not_found("Comment", comment_id))?;

    if !can_access(comment.user_id, auth.user_id, auth.is_superuser()) {
        return Err(not_found("Comment", comment_id));
    }
    Ok(comment)
}

fn render_update(
    state: &AppState,
    auth: &AuthUser,
    comment: &Comment,
    form: &CommentForm,
    errors: &FormErrors,
) -> AppResult<Response> {
    let mut context = base_context(Some(auth));
    context.insert("comment", comment);
    context.insert("form", form);
    context.insert("errors", errors);
    Ok(render(&state.templates, "comment/comment_update.html", &context)?.into_response())
}

/// GET /comment/{id}/update/
pub async fn comment_update_form(
    auth: AuthUser,
    State(state): State<AppState>,
    IdPath(comment_id): IdPath,
) -> AppResult<Response> {
    let comment = find_and_authorize(&state.pool, comment_id, &auth).await?;
    let form = CommentForm {
        message: comment.message.clone(),
    };
    render_update(&state, &auth, &comment, &form, &FormErrors::new())
}

/// POST /comment/{id}/update/
///
/// Replace the message and return to the item it belongs to.
pub async fn comment_update(
    auth: AuthUser,
    State(state): State<AppState>,
    IdPath(comment_id): IdPath,
    Form(form): Form<CommentForm>,
) -> AppResult<Response> {
    let comment = find_and_authorize(&state.pool, comment_id, &auth).await?;

    let message = match form.clean() {
        Ok(message) => message,
        Err(errors) => return render_update(&state, &auth, &comment, &form, &errors),
    };

    let updated = CommentRepo::update(&state.pool, comment.id, &message)
        .await?
        .ok_or_else(|| not_found("Comment", comment.id))?;

    tracing::info!(
        comment_id = updated.id,
        todo_id = updated.todo_id,
        user_id = auth.user_id,
        "Comment updated",
    );

    Ok(Redirect::to(&detail_url(updated.todo_id)).into_response())
}

/// POST /comment/{id}/delete/
pub async fn comment_delete(
    auth: AuthUser,
    State(state): State<AppState>,
    IdPath(comment_id): IdPath,
) -> AppResult<Response> {
    let comment = find_and_authorize(&state.pool, comment_id, &auth).await?;

    if !CommentRepo::delete(&state.pool, comment.id).await? {
        return Err(not_found("Comment", comment.id));
    }

    tracing::info!(
        comment_id = comment.id,
        todo_id = comment.todo_id,
        user_id = auth.user_id,
        "Comment deleted",
    );

    Ok(Redirect::to(&detail_url(comment.todo_id)).into_response())
}
