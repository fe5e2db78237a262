//! Password reset links.
//!
//! A link is `/accounts/reset/{uidb64}/{token}/`. `uidb64` is the user id,
//! base64url-encoded. `token` is an HS256 JWT whose signing key mixes the
//! session secret with the account's current password hash and last login
//! time. Changing the password (or logging in) therefore invalidates every
//! link issued before, which makes each link single-use.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use todo_core::types::DbId;
use todo_db::models::user::User;

/// Marks a JWT as a reset token so no other token kind is accepted.
const RESET_PURPOSE: &str = "password_reset";

/// Default link lifetime in minutes (three days).
pub const DEFAULT_RESET_TIMEOUT_MINS: i64 = 3 * 24 * 60;

#[derive(Debug, Serialize, Deserialize)]
struct ResetClaims {
    sub: DbId,
    purpose: String,
    exp: i64,
    iat: i64,
}

/// Base64url form of a user id, as it appears in reset links.
pub fn encode_uid(user_id: DbId) -> String {
    URL_SAFE_NO_PAD.encode(user_id.to_string())
}

/// Inverse of [`encode_uid`]; `None` for anything it could not have produced.
pub fn decode_uid(uidb64: &str) -> Option<DbId> {
    let bytes = URL_SAFE_NO_PAD.decode(uidb64).ok()?;
    String::from_utf8(bytes).ok()?.parse().ok()
}

/// Signing key bound to the account's current state.
fn state_key(user: &User, secret: &str) -> Vec<u8> {
    let last_login = user
        .last_login_at
        .map(|t| t.timestamp_micros().to_string())
        .unwrap_or_default();
    format!("{secret}\n{}\n{last_login}", user.password_hash).into_bytes()
}

/// Issue a reset token for `user`, valid for `timeout_mins`.
pub fn generate_reset_token(
    user: &User,
    secret: &str,
    timeout_mins: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = ResetClaims {
        sub: user.id,
        purpose: RESET_PURPOSE.to_string(),
        exp: now + timeout_mins * 60,
        iat: now,
    };
    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(&state_key(user, secret)),
    )
}

/// Whether `token` is a live reset token for `user` in its current state.
pub fn check_reset_token(user: &User, token: &str, secret: &str) -> bool {
    let mut validation = Validation::default();
    validation.leeway = 0;

    match decode::<ResetClaims>(
        token,
        &DecodingKey::from_secret(&state_key(user, secret)),
        &validation,
    ) {
        Ok(data) => data.claims.sub == user.id && data.claims.purpose == RESET_PURPOSE,
        Err(e) => {
            tracing::debug!(user_id = user.id, error = %e, "Rejected reset token");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

    fn user(id: DbId, password_hash: &str) -> User {
        let now = chrono::Utc::now();
        User {
            id,
            username: "root".into(),
            email: "root@example.com".into(),
            password_hash: password_hash.into(),
            is_superuser: true,
            is_active: true,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn uid_round_trips_and_rejects_garbage() {
        assert_eq!(decode_uid(&encode_uid(42)), Some(42));
        assert_eq!(decode_uid("not base64!"), None);
        assert_eq!(decode_uid(&URL_SAFE_NO_PAD.encode("abc")), None);
    }

    #[test]
    fn token_is_accepted_for_unchanged_account() {
        let root = user(7, "$argon2id$old");
        let token = generate_reset_token(&root, SECRET, 60).unwrap();
        assert!(check_reset_token(&root, &token, SECRET));
    }

    #[test]
    fn password_change_invalidates_token() {
        let root = user(7, "$argon2id$old");
        let token = generate_reset_token(&root, SECRET, 60).unwrap();
        let changed = user(7, "$argon2id$new");
        assert!(!check_reset_token(&changed, &token, SECRET));
    }

    #[test]
    fn login_invalidates_token() {
        let root = user(7, "$argon2id$old");
        let token = generate_reset_token(&root, SECRET, 60).unwrap();
        let logged_in = User {
            last_login_at: Some(chrono::Utc::now()),
            ..root
        };
        assert!(!check_reset_token(&logged_in, &token, SECRET));
    }

    #[test]
    fn expired_token_is_rejected() {
        let root = user(7, "$argon2id$old");
        let token = generate_reset_token(&root, SECRET, -1).unwrap();
        assert!(!check_reset_token(&root, &token, SECRET));
    }

    #[test]
    fn token_for_another_user_is_rejected() {
        let root = user(7, "$argon2id$same");
        let other = user(8, "$argon2id$same");
        let token = generate_reset_token(&root, SECRET, 60).unwrap();
        assert!(!check_reset_token(&other, &token, SECRET));
        assert!(!check_reset_token(&root, "garbage", SECRET));
    }
}
