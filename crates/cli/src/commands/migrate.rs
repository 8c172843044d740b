//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! apex migrate
//! ```
//!
//! # Environment Variables
//!
//! - `APEX_DATABASE_URL` - `SQLite` connection string (falls back to
//!   `DATABASE_URL`, then `sqlite://apex.db?mode=rwc`)
//!
//! Migration files live in `crates/storefront/migrations/` and are embedded
//! into the binary at compile time.

use apex_storefront::db;
use thiserror::Error;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A migration failed to apply.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run storefront database migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the database cannot be opened or a migration fails.
pub async fn storefront() -> Result<(), MigrationError> {
    let pool = super::connect().await?;

    tracing::info!("Running storefront migrations...");
    db::migrate(&pool).await?;

    tracing::info!("Storefront migrations complete!");
    Ok(())
}
