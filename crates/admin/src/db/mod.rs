//! Database operations for the app's local `SQLite` store.
//!
//! ## Tables
//!
//! - `feedback` - Merchant thumbs up / thumbs down, append-only
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and embedded in the
//! binary. Run them via:
//! ```bash
//! bk-cli migrate
//! ```
//! or set `BUNDLE_RUN_MIGRATIONS=true` to run them on startup.

pub mod feedback;

use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

pub use feedback::{FeedbackRecord, FeedbackRepository, FeedbackSummary};

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a `SQLite` connection pool, creating the database file if needed.
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string, e.g. `sqlite://feedback.db`
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the database cannot be opened.
pub async fn create_pool(database_url: &SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Create a migrated in-memory database, for tests and local experiments.
///
/// The pool holds a single connection that never expires, since every
/// `SQLite` in-memory connection is its own database.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or migrated.
pub async fn create_in_memory_pool() -> Result<SqlitePool, RepositoryError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    MIGRATOR
        .run(&pool)
        .await
        .map_err(|e| RepositoryError::Database(e.into()))?;

    Ok(pool)
}

/// Check that the database answers queries.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn ping(pool: &SqlitePool) -> Result<(), RepositoryError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
