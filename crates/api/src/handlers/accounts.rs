//! Account pages: signup, login, logout, password change and password reset.

use axum::extract::{Path, Query, State};
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use tera::Context;
use todo_core::account::{
    safe_next, LoginForm, PasswordChangeForm, PasswordResetForm, SetPasswordForm, SignupForm,
    DUPLICATE_USERNAME_MESSAGE, INACTIVE_ACCOUNT_MESSAGE, INVALID_LOGIN_MESSAGE,
    WRONG_OLD_PASSWORD_MESSAGE,
};
use todo_core::forms::FormErrors;
use todo_core::roles::role_for;
use todo_db::models::user::{CreateUser, User};
use todo_db::repositories::UserRepo;

use crate::auth::jwt::generate_session_token;
use crate::auth::password::{check_login_password, hash_password, verify_password};
use crate::auth::reset::{check_reset_token, decode_uid, encode_uid, generate_reset_token};
use crate::auth::session::{clear_session_cookie, session_cookie};
use crate::error::{is_unique_violation, not_found, AppError, AppResult};
use crate::mail::OutgoingEmail;
use crate::middleware::auth::AuthUser;
use crate::query::NextParams;
use crate::state::AppState;
use crate::templates::{base_context, render};

/// Unique constraints a signup can trip over: exact name, then name ignoring case.
const USERNAME_CONSTRAINTS: [&str; 2] = ["uq_users_username", "uq_users_username_lower"];

fn hash(password: &str) -> AppResult<String> {
    hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))
}

// ---------------------------------------------------------------------------
// Signup
// ---------------------------------------------------------------------------

fn render_signup(state: &AppState, form: &SignupForm, errors: &FormErrors) -> AppResult<Response> {
    let mut context = base_context(None);
    context.insert("form", form);
    context.insert("errors", errors);
    Ok(render(&state.templates, "registration/signup.html", &context)?.into_response())
}

/// GET /accounts/signup/
pub async fn signup_form(State(state): State<AppState>) -> AppResult<Response> {
    render_signup(&state, &SignupForm::default(), &FormErrors::new())
}

/// POST /accounts/signup/
///
/// Create a regular account and send the visitor to the login page.
pub async fn signup(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> AppResult<Response> {
    let account = match form.clean() {
        Ok(account) => account,
        Err(errors) => return render_signup(&state, &form, &errors),
    };

    let duplicate = || {
        let mut errors = FormErrors::new();
        errors.add("username", DUPLICATE_USERNAME_MESSAGE);
        errors
    };

    if UserRepo::find_by_username_ignoring_case(&state.pool, &account.username)
        .await?
        .is_some()
    {
        return render_signup(&state, &form, &duplicate());
    }

    let input = CreateUser {
        username: account.username,
        email: String::new(),
        password_hash: hash(&account.password)?,
        is_superuser: false,
    };

    // A concurrent signup may still win the race for the name.
    let user = match UserRepo::create(&state.pool, &input).await {
        Ok(user) => user,
        Err(e) if USERNAME_CONSTRAINTS.iter().any(|c| is_unique_violation(&e, c)) => {
            return render_signup(&state, &form, &duplicate());
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = user.id, username = %user.username, "User signed up");

    Ok(Redirect::to(&state.config.logout_redirect_url).into_response())
}

// ---------------------------------------------------------------------------
// Login / logout
// ---------------------------------------------------------------------------

fn render_login(state: &AppState, form: &LoginForm, errors: &FormErrors) -> AppResult<Response> {
    let mut context = base_context(None);
    context.insert("form", form);
    context.insert("errors", errors);
    Ok(render(&state.templates, "registration/login.html", &context)?.into_response())
}

/// GET /accounts/login/
pub async fn login_form(
    State(state): State<AppState>,
    Query(params): Query<NextParams>,
) -> AppResult<Response> {
    let form = LoginForm {
        next: safe_next(params.next.as_deref()).map(str::to_string),
        ..Default::default()
    };
    render_login(&state, &form, &FormErrors::new())
}

/// POST /accounts/login/
///
/// On success, set the session cookie and redirect to `next` (when it
/// stays on this site) or the configured landing page.
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    if let Err(errors) = form.clean() {
        return render_login(&state, &form, &errors);
    }

    let invalid = |message: &str| {
        let mut errors = FormErrors::new();
        errors.add_non_field(message);
        errors
    };

    let user = UserRepo::find_by_username(&state.pool, form.username.trim()).await?;

    // Unknown usernames still pay for one Argon2 verification.
    let password_ok =
        check_login_password(&form.password, user.as_ref().map(|u| u.password_hash.as_str()))
            .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))?;
    let Some(user) = user.filter(|_| password_ok) else {
        tracing::debug!(username = %form.username, "Login failed: bad credentials");
        return render_login(&state, &form, &invalid(INVALID_LOGIN_MESSAGE));
    };
    if !user.is_active {
        return render_login(&state, &form, &invalid(INACTIVE_ACCOUNT_MESSAGE));
    }

    let token = generate_session_token(
        user.id,
        &user.username,
        role_for(user.is_superuser),
        &state.config.session,
    )
    .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    UserRepo::record_login(&state.pool, user.id).await?;

    tracing::info!(user_id = user.id, username = %user.username, "User logged in");

    let target =
        safe_next(form.next.as_deref()).unwrap_or(state.config.login_redirect_url.as_str());
    let cookie = session_cookie(&token, &state.config.session);
    Ok(([(SET_COOKIE, cookie.to_string())], Redirect::to(target)).into_response())
}

/// POST /accounts/logout/
///
/// Works for anonymous visitors too; the cookie is cleared either way.
pub async fn logout(State(state): State<AppState>) -> Response {
    let cookie = clear_session_cookie(&state.config.session);
    (
        [(SET_COOKIE, cookie.to_string())],
        Redirect::to(&state.config.logout_redirect_url),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// Password change
// ---------------------------------------------------------------------------

fn render_password_change(
    state: &AppState,
    auth: &AuthUser,
    errors: &FormErrors,
) -> AppResult<Response> {
    let mut context = base_context(Some(auth));
    context.insert("errors", errors);
    Ok(render(&state.templates, "registration/password_change_form.html", &context)?
        .into_response())
}

/// GET /accounts/password_change/
pub async fn password_change_form(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Response> {
    render_password_change(&state, &auth, &FormErrors::new())
}

/// POST /accounts/password_change/
///
/// The current session stays valid after the change.
pub async fn password_change(
    auth: AuthUser,
    State(state): State<AppState>,
    Form(form): Form<PasswordChangeForm>,
) -> AppResult<Response> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| not_found("User", auth.user_id))?;

    let mut errors = match form.clean(&user.username) {
        Ok(()) => FormErrors::new(),
        Err(errors) => errors,
    };
    if !form.old_password.is_empty() {
        let old_ok = verify_password(&form.old_password, &user.password_hash)
            .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))?;
        if !old_ok {
            errors.add("old_password", WRONG_OLD_PASSWORD_MESSAGE);
        }
    }
    if !errors.is_empty() {
        return render_password_change(&state, &auth, &errors);
    }

    UserRepo::update_password(&state.pool, user.id, &hash(&form.new_password1)?).await?;

    tracing::info!(user_id = user.id, "Password changed");

    Ok(Redirect::to("/accounts/password_change/done/").into_response())
}

/// GET /accounts/password_change/done/
pub async fn password_change_done(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Response> {
    let context = base_context(Some(&auth));
    Ok(render(&state.templates, "registration/password_change_done.html", &context)?
        .into_response())
}

// ---------------------------------------------------------------------------
// Password reset
// ---------------------------------------------------------------------------

const RESET_DONE_PATH: &str = "/accounts/password_reset/done/";
const RESET_COMPLETE_PATH: &str = "/accounts/reset/done/";

fn render_password_reset(
    state: &AppState,
    form: &PasswordResetForm,
    errors: &FormErrors,
) -> AppResult<Response> {
    let mut context = base_context(None);
    context.insert("form", form);
    context.insert("errors", errors);
    Ok(render(&state.templates, "registration/password_reset_form.html", &context)?
        .into_response())
}

/// GET /accounts/password_reset/
pub async fn password_reset_form(State(state): State<AppState>) -> AppResult<Response> {
    render_password_reset(&state, &PasswordResetForm::default(), &FormErrors::new())
}

/// POST /accounts/password_reset/
///
/// Mails a reset link to every active account registered under the
/// address. The visitor lands on the same page whether or not any account
/// matched.
pub async fn password_reset(
    State(state): State<AppState>,
    Form(form): Form<PasswordResetForm>,
) -> AppResult<Response> {
    let email = match form.clean() {
        Ok(email) => email,
        Err(errors) => return render_password_reset(&state, &form, &errors),
    };

    let users = UserRepo::list_active_by_email(&state.pool, &email).await?;
    if users.is_empty() {
        tracing::debug!("Password reset requested for an unknown address");
    }

    for user in &users {
        let message = reset_email(&state, user)?;
        // Delivery problems are logged; the visitor learns nothing either way.
        if let Err(e) = state.mailer.send(message).await {
            tracing::error!(user_id = user.id, error = %e, "Failed to send password reset email");
        } else {
            tracing::info!(user_id = user.id, "Password reset email sent");
        }
    }

    Ok(Redirect::to(RESET_DONE_PATH).into_response())
}

fn reset_email(state: &AppState, user: &User) -> AppResult<OutgoingEmail> {
    let config = &state.config;
    let token = generate_reset_token(
        user,
        &config.session.secret,
        config.password_reset_timeout_mins,
    )
    .map_err(|e| AppError::InternalError(format!("Reset token generation failed: {e}")))?;
    let reset_url = format!(
        "{}/accounts/reset/{}/{token}/",
        config.site_url,
        encode_uid(user.id)
    );

    let mut context = Context::new();
    context.insert("site_url", &config.site_url);
    context.insert("reset_url", &reset_url);
    context.insert("username", &user.username);
    let body = state
        .templates
        .render("registration/password_reset_email.txt", &context)?;

    Ok(OutgoingEmail {
        to: user.email.clone(),
        subject: format!("Password reset on {}", config.site_url),
        body,
    })
}

/// GET /accounts/password_reset/done/
pub async fn password_reset_done(State(state): State<AppState>) -> AppResult<Response> {
    let context = base_context(None);
    Ok(render(&state.templates, "registration/password_reset_done.html", &context)?
        .into_response())
}

/// The account a reset link is for, if the link is still live.
async fn reset_target(state: &AppState, uidb64: &str, token: &str) -> AppResult<Option<User>> {
    let Some(user_id) = decode_uid(uidb64) else {
        return Ok(None);
    };
    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .filter(|u| u.is_active)
        .filter(|u| check_reset_token(u, token, &state.config.session.secret));
    Ok(user)
}

fn render_password_reset_confirm(
    state: &AppState,
    uidb64: &str,
    token: &str,
    validlink: bool,
    errors: &FormErrors,
) -> AppResult<Response> {
    let mut context = base_context(None);
    context.insert("validlink", &validlink);
    context.insert("action", &format!("/accounts/reset/{uidb64}/{token}/"));
    context.insert("errors", errors);
    Ok(render(&state.templates, "registration/password_reset_confirm.html", &context)?
        .into_response())
}

/// GET /accounts/reset/{uidb64}/{token}/
///
/// A dead link renders the "unsuccessful" page with status 200.
pub async fn password_reset_confirm_form(
    State(state): State<AppState>,
    Path((uidb64, token)): Path<(String, String)>,
) -> AppResult<Response> {
    let validlink = reset_target(&state, &uidb64, &token).await?.is_some();
    render_password_reset_confirm(&state, &uidb64, &token, validlink, &FormErrors::new())
}

/// POST /accounts/reset/{uidb64}/{token}/
///
/// Sets the new password. The stored hash changes, which kills the link.
pub async fn password_reset_confirm(
    State(state): State<AppState>,
    Path((uidb64, token)): Path<(String, String)>,
    Form(form): Form<SetPasswordForm>,
) -> AppResult<Response> {
    let Some(user) = reset_target(&state, &uidb64, &token).await? else {
        tracing::debug!("Password reset attempted with a dead link");
        return render_password_reset_confirm(&state, &uidb64, &token, false, &FormErrors::new());
    };

    let password = match form.clean(&user.username) {
        Ok(password) => password,
        Err(errors) => {
            return render_password_reset_confirm(&state, &uidb64, &token, true, &errors);
        }
    };

    UserRepo::update_password(&state.pool, user.id, &hash(&password)?).await?;

    tracing::info!(user_id = user.id, "Password reset");

    Ok(Redirect::to(RESET_COMPLETE_PATH).into_response())
}

/// GET /accounts/reset/done/
pub async fn password_reset_complete(State(state): State<AppState>) -> AppResult<Response> {
    let context = base_context(None);
    Ok(render(&state.templates, "registration/password_reset_complete.html", &context)?
        .into_response())
}
