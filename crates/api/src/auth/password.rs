//! Password storage for user accounts.
//!
//! `users.password_hash` holds an Argon2id PHC string (algorithm, params and
//! salt embedded). Login goes through [`check_login_password`], which costs
//! one Argon2 verification whether or not the username exists.

use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Plaintext behind the stand-in hash used for unknown usernames.
const UNKNOWN_ACCOUNT_PASSWORD: &str = "unknown-account-placeholder";

static UNKNOWN_ACCOUNT_HASH: OnceLock<String> = OnceLock::new();

/// Hash a plaintext password using Argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC string.
///
/// `Ok(false)` on mismatch; `Err` only when `hash` is unreadable.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Check a login attempt.
///
/// `stored_hash` is `None` when no account has the submitted username. The
/// password is then verified against a stand-in hash and the result thrown
/// away, so response time does not reveal whether the account exists.
pub fn check_login_password(
    password: &str,
    stored_hash: Option<&str>,
) -> Result<bool, argon2::password_hash::Error> {
    match stored_hash {
        Some(hash) => verify_password(password, hash),
        None => {
            verify_password(password, unknown_account_hash()?)?;
            Ok(false)
        }
    }
}

/// Hash once per process; later calls reuse it.
fn unknown_account_hash() -> Result<&'static str, argon2::password_hash::Error> {
    if let Some(hash) = UNKNOWN_ACCOUNT_HASH.get() {
        return Ok(hash);
    }
    let hash = hash_password(UNKNOWN_ACCOUNT_PASSWORD)?;
    Ok(UNKNOWN_ACCOUNT_HASH.get_or_init(|| hash))
}

/// Compute the stand-in hash ahead of the first login request.
pub fn prepare_unknown_account_hash() -> Result<(), argon2::password_hash::Error> {
    unknown_account_hash().map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("plum-orchard-42").expect("hashing should succeed");
        assert!(hash.starts_with("$argon2id$"), "expected argon2id PHC prefix");
        assert!(verify_password("plum-orchard-42", &hash).unwrap());
        assert!(!verify_password("plum-orchard-43", &hash).unwrap());
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let a = hash_password("repeat-me-please").unwrap();
        let b = hash_password("repeat-me-please").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_garbage_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }

    #[test]
    fn test_login_check_against_known_account() {
        let hash = hash_password("plum-orchard-42").unwrap();
        assert!(check_login_password("plum-orchard-42", Some(&hash)).unwrap());
        assert!(!check_login_password("wrong", Some(&hash)).unwrap());
    }

    #[test]
    fn test_unknown_account_still_runs_argon2() {
        // Even the stand-in plaintext must not log anyone in.
        assert!(!check_login_password(UNKNOWN_ACCOUNT_PASSWORD, None).unwrap());
        let stand_in = UNKNOWN_ACCOUNT_HASH
            .get()
            .expect("unknown-account path must hash");
        assert!(stand_in.starts_with("$argon2id$"));
        assert!(verify_password(UNKNOWN_ACCOUNT_PASSWORD, stand_in).unwrap());
    }
}
