//! Handlers for the `/todo` pages.
//!
//! All pages require login. Regular users only ever see their own items;
//! superusers see everyone's. An item the caller may not access is
//! answered with 404, exactly like a missing one.

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use todo_core::access::{can_access, visible_owner};
use todo_core::comment::CommentForm;
use todo_core::forms::FormErrors;
use todo_core::pagination::{Page, PageWindow, COMMENT_PAGE_SIZE, TODO_PAGE_SIZE};
use todo_core::search::{like_pattern, normalize_query};
use todo_core::todo::{TodoForm, TodoUpdateForm};
use todo_core::types::DbId;
use todo_db::models::comment::CreateComment;
use todo_db::models::todo::{CreateTodo, Todo, TodoFilter, UpdateTodo};
use todo_db::repositories::{CommentRepo, TodoRepo};

use crate::error::{not_found, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::id_path::IdPath;
use crate::query::{PageParams, TodoListParams};
use crate::state::AppState;
use crate::templates::{base_context, render};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a to-do item and verify the caller owns it (or is a superuser).
///
/// Both a missing item and someone else's item yield `NotFound`. `action`
/// only feeds the debug log.
pub(crate) async fn find_and_authorize(
    pool: &sqlx::PgPool,
    todo_id: DbId,
    auth: &AuthUser,
    action: &str,
) -> AppResult<Todo> {
    let todo = TodoRepo::find_by_id(pool, todo_id)
        .await?
        .ok_or_else(|| not_found("Todo", todo_id))?;

    if !can_access(todo.user_id, auth.user_id, auth.is_superuser()) {
        tracing::debug!(
            todo_id,
            user_id = auth.user_id,
            action,
            "Denied access to another user's todo",
        );
        return Err(not_found("Todo", todo_id));
    }

    Ok(todo)
}

pub(crate) fn detail_url(todo_id: DbId) -> String {
    format!("/todo/{todo_id}/")
}

/// Render the detail page with one page of comments and the comment form.
async fn render_detail(
    state: &AppState,
    auth: &AuthUser,
    todo: &Todo,
    page: Option<&str>,
    form: &CommentForm,
    errors: &FormErrors,
) -> AppResult<Response> {
    let count = CommentRepo::count_for_todo(&state.pool, todo.id).await?;
    let window = PageWindow::resolve(page, count, COMMENT_PAGE_SIZE);
    let comments =
        CommentRepo::list_for_todo(&state.pool, todo.id, window.limit(), window.offset()).await?;

    let mut context = base_context(Some(auth));
    context.insert("todo", todo);
    context.insert("comments", &Page::new(window, comments));
    context.insert("form", form);
    context.insert("errors", errors);
    Ok(render(&state.templates, "todo/todo_info.html", &context)?.into_response())
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

/// GET /todo/
///
/// Paginated list, newest first, optionally filtered by `?q=` against
/// title and description (case-insensitive substring).
pub async fn todo_list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<TodoListParams>,
) -> AppResult<Response> {
    let q = normalize_query(params.q.as_deref());
    let filter = TodoFilter {
        owner_id: visible_owner(auth.user_id, auth.is_superuser()),
        pattern: q.map(like_pattern),
    };

    let count = TodoRepo::count_visible(&state.pool, &filter).await?;
    let window = PageWindow::resolve(params.page.as_deref(), count, TODO_PAGE_SIZE);
    let items =
        TodoRepo::list_visible(&state.pool, &filter, window.limit(), window.offset()).await?;

    let mut context = base_context(Some(&auth));
    context.insert("page_obj", &Page::new(window, items));
    context.insert("q", q.unwrap_or(""));
    Ok(render(&state.templates, "todo/todo_list.html", &context)?.into_response())
}

// ---------------------------------------------------------------------------
// Detail + comment submission
// ---------------------------------------------------------------------------

/// GET /todo/{id}/
///
/// Item detail with its comments, five per page, most recent first.
pub async fn todo_info(
    auth: AuthUser,
    State(state): State<AppState>,
    IdPath(todo_id): IdPath,
    Query(params): Query<PageParams>,
) -> AppResult<Response> {
    let todo = find_and_authorize(&state.pool, todo_id, &auth, "view").await?;
    render_detail(
        &state,
        &auth,
        &todo,
        params.page.as_deref(),
        &CommentForm::default(),
        &FormErrors::new(),
    )
    .await
}

/// POST /todo/{id}/
///
/// Attach a comment to the item. An invalid comment re-renders the detail
/// page with the error; a valid one redirects back to the first page.
pub async fn add_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    IdPath(todo_id): IdPath,
    Form(form): Form<CommentForm>,
) -> AppResult<Response> {
    let todo = find_and_authorize(&state.pool, todo_id, &auth, "comment on").await?;

    let message = match form.clean() {
        Ok(message) => message,
        Err(errors) => return render_detail(&state, &auth, &todo, None, &form, &errors).await,
    };

    let input = CreateComment {
        todo_id: todo.id,
        user_id: auth.user_id,
        message,
    };
    let comment = CommentRepo::create(&state.pool, &input).await?;

    tracing::info!(
        comment_id = comment.id,
        todo_id = todo.id,
        user_id = auth.user_id,
        "Comment created",
    );

    Ok(Redirect::to(&detail_url(todo.id)).into_response())
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// GET /todo/create/
pub async fn todo_create_form(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Response> {
    let mut context = base_context(Some(&auth));
    context.insert("form", &TodoForm::default());
    context.insert("errors", &FormErrors::new());
    Ok(render(&state.templates, "todo/todo_create.html", &context)?.into_response())
}

/// POST /todo/create/
///
/// Create an item owned by the caller and redirect to its detail page.
/// Invalid input re-renders the form and stores nothing.
pub async fn todo_create(
    auth: AuthUser,
    State(state): State<AppState>,
    Form(form): Form<TodoForm>,
) -> AppResult<Response> {
    let clean = match form.clean() {
        Ok(clean) => clean,
        Err(errors) => {
            let mut context = base_context(Some(&auth));
            context.insert("form", &form);
            context.insert("errors", &errors);
            return Ok(render(&state.templates, "todo/todo_create.html", &context)?.into_response());
        }
    };

    let todo = TodoRepo::create(&state.pool, auth.user_id, &CreateTodo::from(clean)).await?;

    tracing::info!(todo_id = todo.id, user_id = auth.user_id, "Todo created");

    Ok(Redirect::to(&detail_url(todo.id)).into_response())
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

fn render_update(
    state: &AppState,
    auth: &AuthUser,
    todo_id: DbId,
    form: &TodoUpdateForm,
    errors: &FormErrors,
) -> AppResult<Response> {
    let mut context = base_context(Some(auth));
    context.insert("todo_id", &todo_id);
    context.insert("form", form);
    context.insert("errors", errors);
    Ok(render(&state.templates, "todo/todo_update.html", &context)?.into_response())
}

/// GET /todo/{id}/update/
pub async fn todo_update_form(
    auth: AuthUser,
    State(state): State<AppState>,
    IdPath(todo_id): IdPath,
) -> AppResult<Response> {
    let todo = find_and_authorize(&state.pool, todo_id, &auth, "edit").await?;
    let form = TodoUpdateForm::from_values(
        &todo.title,
        &todo.description,
        todo.start_date,
        todo.end_date,
        todo.is_completed,
    );
    render_update(&state, &auth, todo.id, &form, &FormErrors::new())
}

/// POST /todo/{id}/update/
pub async fn todo_update(
    auth: AuthUser,
    State(state): State<AppState>,
    IdPath(todo_id): IdPath,
    Form(form): Form<TodoUpdateForm>,
) -> AppResult<Response> {
    let todo = find_and_authorize(&state.pool, todo_id, &auth, "edit").await?;

    let (clean, is_completed) = match form.clean() {
        Ok(cleaned) => cleaned,
        Err(errors) => return render_update(&state, &auth, todo.id, &form, &errors),
    };

    let input = UpdateTodo::from_clean(clean, is_completed);
    let updated = TodoRepo::update(&state.pool, todo.id, &input)
        .await?
        .ok_or_else(|| not_found("Todo", todo.id))?;

    tracing::info!(
        todo_id = updated.id,
        user_id = auth.user_id,
        is_completed = updated.is_completed,
        "Todo updated",
    );

    Ok(Redirect::to(&detail_url(updated.id)).into_response())
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

/// GET /todo/{id}/delete/ -- confirmation page.
pub async fn todo_delete_confirm(
    auth: AuthUser,
    State(state): State<AppState>,
    IdPath(todo_id): IdPath,
) -> AppResult<Response> {
    let todo = find_and_authorize(&state.pool, todo_id, &auth, "delete").await?;
    let mut context = base_context(Some(&auth));
    context.insert("todo", &todo);
    Ok(render(&state.templates, "todo/todo_confirm_delete.html", &context)?.into_response())
}

/// POST /todo/{id}/delete/
///
/// Delete the item (its comments go with it) and return to the list.
pub async fn todo_delete(
    auth: AuthUser,
    State(state): State<AppState>,
    IdPath(todo_id): IdPath,
) -> AppResult<Response> {
    let todo = find_and_authorize(&state.pool, todo_id, &auth, "delete").await?;

    if !TodoRepo::delete(&state.pool, todo.id).await? {
        return Err(not_found("Todo", todo.id));
    }

    tracing::info!(todo_id = todo.id, user_id = auth.user_id, "Todo deleted");

    Ok(Redirect::to("/todo/").into_response())
}
