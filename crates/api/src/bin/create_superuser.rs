//! create-superuser: create an account with the superuser flag set.
//!
//! The password comes from `--password` or, when omitted, the
//! `SUPERUSER_PASSWORD` environment variable. `DATABASE_URL` is read the
//! same way the server reads it (`.env` included).

use anyhow::{bail, Context};
use clap::Parser;
use todo_api::auth::password::hash_password;
use todo_core::account::{is_valid_username, password_problems, MAX_USERNAME_LENGTH};
use todo_db::models::user::CreateUser;
use todo_db::repositories::UserRepo;

#[derive(Parser, Debug)]
#[command(name = "create-superuser")]
#[command(about = "Creates a superuser account", long_about = None)]
struct Args {
    /// Username for the superuser
    #[arg(long, value_name = "USERNAME")]
    username: String,

    /// Email address for the superuser
    #[arg(long, value_name = "EMAIL", default_value = "")]
    email: String,

    /// Password (falls back to SUPERUSER_PASSWORD)
    #[arg(long, value_name = "PASSWORD")]
    password: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let username = args.username.trim();
    if !is_valid_username(username) || username.chars().count() > MAX_USERNAME_LENGTH {
        bail!("invalid username {username:?}");
    }

    let password = match args.password {
        Some(p) => p,
        None => std::env::var("SUPERUSER_PASSWORD")
            .context("pass --password or set SUPERUSER_PASSWORD")?,
    };
    let problems = password_problems(&password, username);
    if !problems.is_empty() {
        bail!("password rejected: {}", problems.join(" "));
    }

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = todo_db::create_pool(&database_url)
        .await
        .context("failed to connect to database")?;
    todo_db::run_migrations(&pool)
        .await
        .context("failed to run database migrations")?;

    if UserRepo::find_by_username_ignoring_case(&pool, username).await?.is_some() {
        bail!("a user named {username:?} already exists");
    }

    let password_hash =
        hash_password(&password).map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?;
    let user = UserRepo::create(
        &pool,
        &CreateUser {
            username: username.to_string(),
            email: args.email,
            password_hash,
            is_superuser: true,
        },
    )
    .await
    .context("failed to create user")?;

    println!("Superuser {:?} created (id {}).", user.username, user.id);
    Ok(())
}
