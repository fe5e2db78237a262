#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use todo_api::auth::jwt::{generate_session_token, SessionConfig};
use todo_api::auth::password::hash_password;
use todo_api::auth::session::SESSION_COOKIE;
use todo_api::config::ServerConfig;
use todo_api::mail::{Mailer, Outbox};
use todo_api::router::build_app_router;
use todo_api::state::AppState;
use todo_api::templates::build_templates;
use todo_core::roles::role_for;
use todo_db::models::todo::{CreateTodo, Todo};
use todo_db::models::user::{CreateUser, User};
use todo_db::repositories::{TodoRepo, UserRepo};

/// Plaintext password of every user made by [`create_user`].
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        login_redirect_url: "/todo/".to_string(),
        logout_redirect_url: "/accounts/login/".to_string(),
        site_url: "http://testserver".to_string(),
        password_reset_timeout_mins: 60,
        session: SessionConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            expiry_mins: 60,
            cookie_secure: false,
        },
        email: None,
    }
}

/// Build the full application router, middleware included, on `pool`.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_outbox(pool).0
}

/// Like [`build_test_app`], also returning the outbox that receives mail.
pub fn build_test_app_with_outbox(pool: PgPool) -> (Router, Outbox) {
    let config = test_config();
    let outbox = Outbox::new();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        templates: Arc::new(build_templates().expect("templates should compile")),
        mailer: Mailer::Memory(outbox.clone()),
    };
    (build_app_router(state, &config), outbox)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user whose password is [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, username: &str, is_superuser: bool) -> User {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@test.com"),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        is_superuser,
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// Insert a to-do item owned by `user`.
pub async fn create_todo(pool: &PgPool, user: &User, title: &str, description: &str) -> Todo {
    let input = CreateTodo {
        title: title.to_string(),
        description: description.to_string(),
        start_date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2026, 10, 8).unwrap(),
    };
    TodoRepo::create(pool, user.id, &input)
        .await
        .expect("todo creation should succeed")
}

/// A `Cookie` header value carrying a valid session for `user`.
pub fn session_for(user: &User) -> String {
    let token = generate_session_token(
        user.id,
        &user.username,
        role_for(user.is_superuser),
        &test_config().session,
    )
    .expect("token generation should succeed");
    format!("{SESSION_COOKIE}={token}")
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_as(app: Router, uri: &str, cookie: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(cookie), None).await
}

/// POST an `application/x-www-form-urlencoded` body.
pub async fn post_form(
    app: Router,
    uri: &str,
    cookie: Option<&str>,
    fields: &[(&str, &str)],
) -> Response<Body> {
    let body = serde_urlencoded::to_string(fields).expect("form encoding should succeed");
    send(app, Method::POST, uri, cookie, Some(body)).await
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    form: Option<String>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let request = match form {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body)),
        None => builder.body(Body::empty()),
    }
    .unwrap();
    app.oneshot(request).await.unwrap()
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).expect("body should be UTF-8")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(LOCATION)
        .expect("response should redirect")
        .to_str()
        .unwrap()
}

/// The `Set-Cookie` header value, if any.
pub fn set_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(SET_COOKIE)
        .map(|v| v.to_str().unwrap().to_string())
}
