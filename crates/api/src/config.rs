use crate::auth::jwt::SessionConfig;
use crate::auth::reset::DEFAULT_RESET_TIMEOUT_MINS;
use crate::mail::EmailConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Where a successful login lands when no `next` is given.
    pub login_redirect_url: String,
    /// Where logout and signup land.
    pub logout_redirect_url: String,
    /// Scheme and host prefixed to links in outgoing mail.
    pub site_url: String,
    /// How long a password reset link stays valid, in minutes.
    pub password_reset_timeout_mins: i64,
    /// Session token configuration (secret, lifetime, cookie flags).
    pub session: SessionConfig,
    /// SMTP settings; `None` when mail is only logged.
    pub email: Option<EmailConfig>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                   |
    /// |-------------------------------|---------------------------|
    /// | `HOST`                        | `0.0.0.0`                 |
    /// | `PORT`                        | `3000`                    |
    /// | `REQUEST_TIMEOUT_SECS`        | `30`                      |
    /// | `LOGIN_REDIRECT_URL`          | `/todo/`                  |
    /// | `LOGOUT_REDIRECT_URL`         | `/accounts/login/`        |
    /// | `SITE_URL`                    | `http://localhost:{PORT}` |
    /// | `PASSWORD_RESET_TIMEOUT_MINS` | `4320`                    |
    ///
    /// Session and SMTP variables are read by [`SessionConfig::from_env`]
    /// and [`EmailConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let login_redirect_url =
            std::env::var("LOGIN_REDIRECT_URL").unwrap_or_else(|_| "/todo/".into());
        let logout_redirect_url =
            std::env::var("LOGOUT_REDIRECT_URL").unwrap_or_else(|_| "/accounts/login/".into());

        let site_url = std::env::var("SITE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}"))
            .trim_end_matches('/')
            .to_string();

        let password_reset_timeout_mins: i64 = std::env::var("PASSWORD_RESET_TIMEOUT_MINS")
            .unwrap_or_else(|_| DEFAULT_RESET_TIMEOUT_MINS.to_string())
            .parse()
            .expect("PASSWORD_RESET_TIMEOUT_MINS must be a valid i64");

        let session = SessionConfig::from_env();
        let email = EmailConfig::from_env();

        Self {
            host,
            port,
            request_timeout_secs,
            login_redirect_url,
            logout_redirect_url,
            site_url,
            password_reset_timeout_mins,
            session,
            email,
        }
    }
}
