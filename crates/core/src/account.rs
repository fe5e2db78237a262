//! Account forms: signup, login, password change and password reset.
//!
//! These only check what can be checked without the database. Username
//! uniqueness and credential verification happen in the handlers.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::forms::FormErrors;

/// Maximum username length (characters).
pub const MAX_USERNAME_LENGTH: usize = 150;

/// Minimum password length (characters).
pub const MIN_PASSWORD_LENGTH: usize = 8;

pub const INVALID_USERNAME_MESSAGE: &str = "Enter a valid username. This value may contain only \
                                            letters, numbers, and @/./+/-/_ characters.";
pub const DUPLICATE_USERNAME_MESSAGE: &str = "A user with that username already exists.";
pub const PASSWORD_MISMATCH_MESSAGE: &str = "The two password fields didn't match.";
pub const INVALID_LOGIN_MESSAGE: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";
pub const INACTIVE_ACCOUNT_MESSAGE: &str = "This account is inactive.";
pub const WRONG_OLD_PASSWORD_MESSAGE: &str =
    "Your old password was entered incorrectly. Please enter it again.";
pub const INVALID_EMAIL_MESSAGE: &str = "Enter a valid email address.";

// ---------------------------------------------------------------------------
// Signup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct SignupForm {
    #[validate(length(
        max = 150,
        message = "Ensure this value has at most 150 characters."
    ))]
    pub username: String,
    #[serde(skip_serializing)]
    pub password1: String,
    #[serde(skip_serializing)]
    pub password2: String,
}

/// A validated signup: the password is still plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub username: String,
    pub password: String,
}

impl SignupForm {
    /// The username is trimmed before any rule runs; passwords are kept verbatim.
    pub fn clean(&self) -> Result<NewAccount, FormErrors> {
        let form = Self {
            username: self.username.trim().to_string(),
            ..self.clone()
        };
        let mut errors = match form.validate() {
            Ok(()) => FormErrors::new(),
            Err(e) => FormErrors::from_validation(&e),
        };

        let username = form.username.as_str();
        if !errors.require("username", username) && !is_valid_username(username) {
            errors.add("username", INVALID_USERNAME_MESSAGE);
        }
        errors.require("password1", &self.password1);
        if !errors.require("password2", &self.password2) {
            check_new_password(
                &mut errors,
                "password2",
                &self.password1,
                &self.password2,
                username,
            );
        }

        errors.finish(|| NewAccount {
            username: username.to_string(),
            password: self.password1.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    /// Where to go after a successful login.
    pub next: Option<String>,
}

impl LoginForm {
    /// Check that both credentials were supplied.
    pub fn clean(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        errors.require("username", &self.username);
        errors.require("password", &self.password);
        errors.finish(|| ())
    }
}

// ---------------------------------------------------------------------------
// Password change
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PasswordChangeForm {
    pub old_password: String,
    pub new_password1: String,
    pub new_password2: String,
}

impl PasswordChangeForm {
    /// Check presence, confirmation and policy of the new password.
    ///
    /// `username` feeds the similarity rule.
    pub fn clean(&self, username: &str) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        errors.require("old_password", &self.old_password);
        errors.require("new_password1", &self.new_password1);
        if !errors.require("new_password2", &self.new_password2) {
            check_new_password(
                &mut errors,
                "new_password2",
                &self.new_password1,
                &self.new_password2,
                username,
            );
        }
        errors.finish(|| ())
    }
}

// ---------------------------------------------------------------------------
// Password reset
// ---------------------------------------------------------------------------

/// First step of a reset: the address the link is mailed to.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct PasswordResetForm {
    #[validate(
        email(message = "Enter a valid email address."),
        length(max = 254, message = "Ensure this value has at most 254 characters.")
    )]
    pub email: String,
}

impl PasswordResetForm {
    /// Return the trimmed address, or the field errors.
    pub fn clean(&self) -> Result<String, FormErrors> {
        let form = Self {
            email: self.email.trim().to_string(),
        };
        let mut errors = FormErrors::new();
        if !errors.require("email", &form.email) {
            if let Err(e) = form.validate() {
                errors.extend(FormErrors::from_validation(&e));
            }
        }
        errors.finish(|| form.email.clone())
    }
}

/// Last step of a reset: the new password, entered twice. No old password.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SetPasswordForm {
    pub new_password1: String,
    pub new_password2: String,
}

impl SetPasswordForm {
    /// Return the new password, or the field errors.
    ///
    /// `username` feeds the similarity rule.
    pub fn clean(&self, username: &str) -> Result<String, FormErrors> {
        let mut errors = FormErrors::new();
        errors.require("new_password1", &self.new_password1);
        if !errors.require("new_password2", &self.new_password2) {
            check_new_password(
                &mut errors,
                "new_password2",
                &self.new_password1,
                &self.new_password2,
                username,
            );
        }
        errors.finish(|| self.new_password1.clone())
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Letters, digits and `@ . + - _` only.
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

/// Password policy messages for `password`; empty when acceptable.
pub fn password_problems(password: &str, username: &str) -> Vec<String> {
    let mut problems = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        problems.push(format!(
            "This password is too short. It must contain at least {MIN_PASSWORD_LENGTH} characters."
        ));
    }

    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        problems.push("This password is entirely numeric.".to_string());
    }

    let lowered = password.to_lowercase();
    let user = username.to_lowercase();
    if user.chars().count() >= 3
        && !lowered.is_empty()
        && (lowered.contains(&user) || user.contains(&lowered))
    {
        problems.push("The password is too similar to the username.".to_string());
    }

    problems
}

/// Confirmation match first, policy only once both entries agree.
fn check_new_password(
    errors: &mut FormErrors,
    field: &str,
    password: &str,
    confirmation: &str,
    username: &str,
) {
    if password != confirmation {
        errors.add(field, PASSWORD_MISMATCH_MESSAGE);
        return;
    }
    for problem in password_problems(password, username) {
        errors.add(field, problem);
    }
}

/// Accept a post-login redirect target only if it stays on this site.
///
/// Control characters are refused outright: browsers drop tab, CR and LF
/// from URLs, so `/\t/host` would be followed as `//host`.
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|n| {
        !n.chars().any(|c| c.is_control())
            && n.starts_with('/')
            && !n.starts_with("//")
            && !n.contains('\\')
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
