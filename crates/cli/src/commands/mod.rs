//! CLI subcommands.

pub mod feedback;
pub mod migrate;

use bundle_kit_admin::db;
use sqlx::SqlitePool;
use thiserror::Error;

/// Errors shared by the database-backed commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Database connection or query error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Repository error.
    #[error("Repository error: {0}")]
    Repository(#[from] db::RepositoryError),

    /// Output could not be serialized.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Connect to the feedback database named by the environment.
async fn connect() -> Result<SqlitePool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = bundle_kit_admin::config::database_url_from_env();
    tracing::info!("Connecting to feedback database...");
    Ok(db::create_pool(&database_url).await?)
}
