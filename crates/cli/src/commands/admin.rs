//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! apex admin create -e admin@example.com -n "Admin Name" -p '...'
//! ```
//!
//! # Environment Variables
//!
//! - `APEX_DATABASE_URL` - `SQLite` connection string
//! - `APEX_ADMIN_PASSWORD` - Used when `-p` is omitted

use apex_core::{Email, EmailError, Role, UserId};
use apex_storefront::db::{RepositoryError, UserRepository};
use apex_storefront::services::auth::{AuthError, hash_password, validate_password};
use secrecy::{ExposeSecret, SecretString};
use sqlx::SqlitePool;
use thiserror::Error;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Repository error.
    #[error("Database error: {0}")]
    Repository(RepositoryError),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Blank display name.
    #[error("Admin name cannot be empty")]
    InvalidName,

    /// Password rejected or could not be hashed.
    #[error("{0}")]
    Password(#[from] AuthError),

    /// User already exists.
    #[error("User already exists with email: {0}")]
    UserExists(String),
}

/// Create a new admin user.
///
/// # Arguments
///
/// * `email` - Admin's email address
/// * `name` - Admin's display name
/// * `password` - Admin's password
///
/// # Returns
///
/// The ID of the created admin user.
///
/// # Errors
///
/// Returns `AdminError` if validation fails, the email is taken or the
/// database is unreachable.
pub async fn create_user(
    email: &str,
    name: &str,
    password: &SecretString,
) -> Result<UserId, AdminError> {
    let pool = super::connect().await?;
    insert_admin(&pool, email, name, password).await
}

/// Validate and insert an admin account.
pub(crate) async fn insert_admin(
    pool: &SqlitePool,
    email: &str,
    name: &str,
    password: &SecretString,
) -> Result<UserId, AdminError> {
    let email = Email::parse(email)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(AdminError::InvalidName);
    }
    validate_password(password.expose_secret())?;
    let password_hash = hash_password(password.expose_secret())?;

    tracing::info!("Creating admin user: {}", email);

    let user = UserRepository::new(pool)
        .create(name, &email, &password_hash, Role::Admin)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AdminError::UserExists(email.as_str().to_owned()),
            other => AdminError::Repository(other),
        })?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Email: {}",
        user.id,
        user.email
    );

    Ok(user.id)
}
