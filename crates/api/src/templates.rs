//! HTML templates.
//!
//! Templates are compiled into the binary so the server does not depend on
//! its working directory. `.html` names get Tera's HTML autoescaping; the
//! `.txt` mail bodies do not.

use axum::response::Html;
use tera::{Context, Tera};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;

/// Every template, by the name handlers render it under.
const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    (
        "registration/signup.html",
        include_str!("../templates/registration/signup.html"),
    ),
    (
        "registration/login.html",
        include_str!("../templates/registration/login.html"),
    ),
    (
        "registration/password_change_form.html",
        include_str!("../templates/registration/password_change_form.html"),
    ),
    (
        "registration/password_change_done.html",
        include_str!("../templates/registration/password_change_done.html"),
    ),
    (
        "registration/password_reset_form.html",
        include_str!("../templates/registration/password_reset_form.html"),
    ),
    (
        "registration/password_reset_done.html",
        include_str!("../templates/registration/password_reset_done.html"),
    ),
    (
        "registration/password_reset_confirm.html",
        include_str!("../templates/registration/password_reset_confirm.html"),
    ),
    (
        "registration/password_reset_complete.html",
        include_str!("../templates/registration/password_reset_complete.html"),
    ),
    (
        "registration/password_reset_email.txt",
        include_str!("../templates/registration/password_reset_email.txt"),
    ),
    (
        "todo/todo_list.html",
        include_str!("../templates/todo/todo_list.html"),
    ),
    (
        "todo/todo_info.html",
        include_str!("../templates/todo/todo_info.html"),
    ),
    (
        "todo/todo_create.html",
        include_str!("../templates/todo/todo_create.html"),
    ),
    (
        "todo/todo_update.html",
        include_str!("../templates/todo/todo_update.html"),
    ),
    (
        "todo/todo_confirm_delete.html",
        include_str!("../templates/todo/todo_confirm_delete.html"),
    ),
    (
        "comment/comment_update.html",
        include_str!("../templates/comment/comment_update.html"),
    ),
];

/// Compile all templates. Fails on any syntax error.
pub fn build_templates() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(TEMPLATES.iter().copied())?;
    Ok(tera)
}

/// A context pre-filled with the current user (if any).
pub fn base_context(user: Option<&AuthUser>) -> Context {
    let mut context = Context::new();
    context.insert("user", &user);
    context
}

/// Number of compiled templates, reported by the health check.
pub fn template_count(tera: &Tera) -> usize {
    tera.get_template_names().count()
}

/// Render `name` with `context` into an HTML response body.
pub fn render(tera: &Tera, name: &str, context: &Context) -> AppResult<Html<String>> {
    Ok(Html(tera.render(name, context)?))
}
