//! The session cookie.
//!
//! Browsers carry the session token in an HttpOnly cookie. Scripted clients
//! may send the same token as `Authorization: Bearer <token>` instead.

use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::HeaderMap;
use cookie::time::Duration;
use cookie::{Cookie, SameSite};

use super::jwt::SessionConfig;

/// Name of the cookie holding the session token.
pub const SESSION_COOKIE: &str = "todo_session";

/// Build the `Set-Cookie` value that starts a session.
pub fn session_cookie(token: &str, config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .max_age(Duration::minutes(config.expiry_mins))
        .build()
}

/// Build the `Set-Cookie` value that ends a session.
pub fn clear_session_cookie(config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .max_age(Duration::ZERO)
        .build()
}

/// Find the session token in the request headers.
///
/// The cookie wins over a bearer header when both are present.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|c| c.name() == SESSION_COOKIE && !c.value().is_empty())
        .map(|c| c.value().to_string());

    from_cookie.or_else(|| {
        headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::to_string)
    })
}
