//! HTTP-level integration tests for signup, login, logout, password change
//! and password reset.

mod common;

use axum::http::StatusCode;
use common::{
    body_text, create_user, get, get_as, location, post_form, session_for, set_cookie,
    TEST_PASSWORD,
};
use sqlx::PgPool;
use todo_api::auth::password::verify_password;
use todo_api::mail::Outbox;
use todo_core::account::{
    DUPLICATE_USERNAME_MESSAGE, INVALID_EMAIL_MESSAGE, INVALID_LOGIN_MESSAGE,
};
use todo_db::repositories::UserRepo;

// ---------------------------------------------------------------------------
// Signup
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn signup_creates_regular_user_and_redirects_to_login(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = post_form(
        app,
        "/accounts/signup/",
        None,
        &[
            ("username", "carol"),
            ("password1", "plum-orchard-42"),
            ("password2", "plum-orchard-42"),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/accounts/login/");

    let user = UserRepo::find_by_username(&pool, "carol").await.unwrap().unwrap();
    assert!(!user.is_superuser);
    assert!(user.is_active);
    assert!(verify_password("plum-orchard-42", &user.password_hash).unwrap());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn signup_rejects_mismatched_passwords(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = post_form(
        app,
        "/accounts/signup/",
        None,
        &[
            ("username", "carol"),
            ("password1", "plum-orchard-42"),
            ("password2", "plum-orchard-43"),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("password fields didn"));
    assert!(UserRepo::find_by_username(&pool, "carol").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn signup_rejects_duplicate_username(pool: PgPool) {
    create_user(&pool, "carol", false).await;
    let app = common::build_test_app(pool);

    let response = post_form(
        app,
        "/accounts/signup/",
        None,
        &[
            ("username", "carol"),
            ("password1", "plum-orchard-42"),
            ("password2", "plum-orchard-42"),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(DUPLICATE_USERNAME_MESSAGE));
    assert!(html.contains("value=\"carol\""));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn signup_rejects_username_differing_only_in_case(pool: PgPool) {
    create_user(&pool, "carol", false).await;
    let app = common::build_test_app(pool.clone());

    let response = post_form(
        app,
        "/accounts/signup/",
        None,
        &[
            ("username", "Carol"),
            ("password1", "plum-orchard-42"),
            ("password2", "plum-orchard-42"),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(DUPLICATE_USERNAME_MESSAGE));
    assert!(UserRepo::find_by_username(&pool, "Carol").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn signup_page_renders(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/accounts/signup/").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("name=\"password2\""));
}

// ---------------------------------------------------------------------------
// Login / logout
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn login_sets_session_cookie_and_follows_next(pool: PgPool) {
    create_user(&pool, "dave", false).await;
    let app = common::build_test_app(pool.clone());

    let response = post_form(
        app.clone(),
        "/accounts/login/",
        None,
        &[
            ("username", "dave"),
            ("password", TEST_PASSWORD),
            ("next", "/todo/?q=milk"),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/todo/?q=milk");

    let cookie = set_cookie(&response).expect("login must set a cookie");
    assert!(cookie.contains("HttpOnly"));
    let session = cookie.split(';').next().unwrap().to_string();
    assert!(session.starts_with("todo_session="));

    // The issued cookie opens protected pages.
    let response = get_as(app, "/todo/", &session).await;
    assert_eq!(response.status(), StatusCode::OK);

    let user = UserRepo::find_by_username(&pool, "dave").await.unwrap().unwrap();
    assert!(user.last_login_at.is_some());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_ignores_offsite_next(pool: PgPool) {
    create_user(&pool, "dave", false).await;
    let app = common::build_test_app(pool);

    let response = post_form(
        app,
        "/accounts/login/",
        None,
        &[
            ("username", "dave"),
            ("password", TEST_PASSWORD),
            ("next", "https://evil.example/"),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/todo/");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_ignores_next_with_control_characters(pool: PgPool) {
    create_user(&pool, "dave", false).await;
    let app = common::build_test_app(pool);

    let response = post_form(
        app,
        "/accounts/login/",
        None,
        &[
            ("username", "dave"),
            ("password", TEST_PASSWORD),
            ("next", "/\t/evil.example"),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/todo/");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_with_wrong_password_shows_error(pool: PgPool) {
    create_user(&pool, "dave", false).await;
    let app = common::build_test_app(pool);

    let response = post_form(
        app,
        "/accounts/login/",
        None,
        &[("username", "dave"), ("password", "not-the-password")],
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie(&response).is_none());
    assert!(body_text(response).await.contains(INVALID_LOGIN_MESSAGE));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_with_unknown_user_shows_same_error(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_form(
        app,
        "/accounts/login/",
        None,
        &[("username", "nobody"), ("password", TEST_PASSWORD)],
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie(&response).is_none());
    assert!(body_text(response).await.contains(INVALID_LOGIN_MESSAGE));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn deactivated_user_session_is_rejected(pool: PgPool) {
    let dave = create_user(&pool, "dave", false).await;
    let cookie = session_for(&dave);
    sqlx::query("UPDATE users SET is_active = FALSE WHERE id = $1")
        .bind(dave.id)
        .execute(&pool)
        .await
        .unwrap();
    let app = common::build_test_app(pool);

    let response = get_as(app, "/todo/", &cookie).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/accounts/login/"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_page_keeps_next_in_form(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/accounts/login/?next=%2Ftodo%2F5%2F").await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("name=\"next\" value=\"&#x2F;todo&#x2F;5&#x2F;\""));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn logout_clears_cookie(pool: PgPool) {
    let dave = create_user(&pool, "dave", false).await;
    let app = common::build_test_app(pool);

    let response = post_form(app, "/accounts/logout/", Some(&session_for(&dave)), &[]).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/accounts/login/");
    let cookie = set_cookie(&response).expect("logout must reset the cookie");
    assert!(cookie.starts_with("todo_session=;"));
    assert!(cookie.contains("Max-Age=0"));
}

// ---------------------------------------------------------------------------
// Password change
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn password_change_requires_login(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/accounts/password_change/").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        "/accounts/login/?next=%2Faccounts%2Fpassword_change%2F"
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn password_change_rejects_wrong_old_password(pool: PgPool) {
    let dave = create_user(&pool, "dave", false).await;
    let app = common::build_test_app(pool.clone());

    let response = post_form(
        app,
        "/accounts/password_change/",
        Some(&session_for(&dave)),
        &[
            ("old_password", "guess"),
            ("new_password1", "brand-new-secret"),
            ("new_password2", "brand-new-secret"),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("old password was entered incorrectly"));

    let user = UserRepo::find_by_id(&pool, dave.id).await.unwrap().unwrap();
    assert!(verify_password(TEST_PASSWORD, &user.password_hash).unwrap());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn password_change_updates_hash(pool: PgPool) {
    let dave = create_user(&pool, "dave", false).await;
    let cookie = session_for(&dave);
    let app = common::build_test_app(pool.clone());

    let response = post_form(
        app.clone(),
        "/accounts/password_change/",
        Some(&cookie),
        &[
            ("old_password", TEST_PASSWORD),
            ("new_password1", "brand-new-secret"),
            ("new_password2", "brand-new-secret"),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/accounts/password_change/done/");

    let user = UserRepo::find_by_id(&pool, dave.id).await.unwrap().unwrap();
    assert!(verify_password("brand-new-secret", &user.password_hash).unwrap());

    let done = get_as(app, "/accounts/password_change/done/", &cookie).await;
    assert_eq!(done.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Password reset
// ---------------------------------------------------------------------------

/// Path part of the only reset link in `outbox`.
fn reset_path(outbox: &Outbox) -> String {
    let messages = outbox.messages();
    assert_eq!(messages.len(), 1, "exactly one reset email expected");
    let body = &messages[0].body;
    let start = body
        .find("http://testserver/accounts/reset/")
        .expect("email should carry a reset link");
    let url = body[start..].split_whitespace().next().unwrap();
    url.trim_start_matches("http://testserver").to_string()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn password_reset_page_renders(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/accounts/password_reset/").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("name=\"email\""));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn password_reset_flow_sets_new_password_once(pool: PgPool) {
    let root = create_user(&pool, "root", true).await;
    let (app, outbox) = common::build_test_app_with_outbox(pool.clone());

    let response = post_form(
        app.clone(),
        "/accounts/password_reset/",
        None,
        &[("email", "ROOT@test.com")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/accounts/password_reset/done/");

    let messages = outbox.messages();
    assert_eq!(messages[0].to, "root@test.com");
    assert!(messages[0].body.contains("root"));
    let link = reset_path(&outbox);

    let form = get(app.clone(), &link).await;
    assert_eq!(form.status(), StatusCode::OK);
    assert!(body_text(form).await.contains("name=\"new_password1\""));

    let response = post_form(
        app.clone(),
        &link,
        None,
        &[
            ("new_password1", "reset-orchard-77"),
            ("new_password2", "reset-orchard-77"),
        ],
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/accounts/reset/done/");

    let user = UserRepo::find_by_id(&pool, root.id).await.unwrap().unwrap();
    assert!(verify_password("reset-orchard-77", &user.password_hash).unwrap());

    // The link died with the old password.
    let reused = get(app.clone(), &link).await;
    assert_eq!(reused.status(), StatusCode::OK);
    assert!(body_text(reused).await.contains("Password reset unsuccessful"));

    let response = post_form(
        app.clone(),
        &link,
        None,
        &[
            ("new_password1", "second-orchard-88"),
            ("new_password2", "second-orchard-88"),
        ],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let user = UserRepo::find_by_id(&pool, root.id).await.unwrap().unwrap();
    assert!(verify_password("reset-orchard-77", &user.password_hash).unwrap());

    let done = get(app, "/accounts/reset/done/").await;
    assert_eq!(done.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn password_reset_for_unknown_address_sends_nothing(pool: PgPool) {
    let (app, outbox) = common::build_test_app_with_outbox(pool);

    let response = post_form(
        app.clone(),
        "/accounts/password_reset/",
        None,
        &[("email", "nobody@test.com")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/accounts/password_reset/done/");
    assert!(outbox.messages().is_empty());

    let done = get(app, "/accounts/password_reset/done/").await;
    assert_eq!(done.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn password_reset_rejects_bad_address(pool: PgPool) {
    let (app, outbox) = common::build_test_app_with_outbox(pool);

    let response = post_form(app, "/accounts/password_reset/", None, &[("email", "nope")]).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(INVALID_EMAIL_MESSAGE));
    assert!(outbox.messages().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn tampered_reset_link_is_refused(pool: PgPool) {
    let root = create_user(&pool, "root", true).await;
    let (app, outbox) = common::build_test_app_with_outbox(pool.clone());

    post_form(
        app.clone(),
        "/accounts/password_reset/",
        None,
        &[("email", "root@test.com")],
    )
    .await;
    let link = reset_path(&outbox);
    let tampered = format!("{}x/", link.trim_end_matches('/'));

    for uri in [tampered.as_str(), "/accounts/reset/Nw/garbage/", "/accounts/reset/!!/x/"] {
        let response = post_form(
            app.clone(),
            uri,
            None,
            &[
                ("new_password1", "reset-orchard-77"),
                ("new_password2", "reset-orchard-77"),
            ],
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert!(body_text(response).await.contains("Password reset unsuccessful"));
    }

    let user = UserRepo::find_by_id(&pool, root.id).await.unwrap().unwrap();
    assert!(verify_password(TEST_PASSWORD, &user.password_hash).unwrap());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn reset_form_applies_password_policy(pool: PgPool) {
    create_user(&pool, "root", true).await;
    let (app, outbox) = common::build_test_app_with_outbox(pool);

    post_form(
        app.clone(),
        "/accounts/password_reset/",
        None,
        &[("email", "root@test.com")],
    )
    .await;
    let link = reset_path(&outbox);

    let response = post_form(
        app,
        &link,
        None,
        &[("new_password1", "12345678"), ("new_password2", "12345678")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("entirely numeric"));
}
