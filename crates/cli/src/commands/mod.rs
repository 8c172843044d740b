//! CLI command implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use apex_storefront::{config, db};
use sqlx::SqlitePool;

/// Connect to the storefront database named by the environment.
///
/// # Errors
///
/// Returns `sqlx::Error` if the database cannot be opened.
pub async fn connect() -> Result<SqlitePool, sqlx::Error> {
    dotenvy::dotenv().ok();

    tracing::info!("Connecting to storefront database...");
    db::create_pool(&config::database_url_from_env()).await
}
