//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! bk-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `BUNDLE_DATABASE_URL` (or `DATABASE_URL`) - `SQLite` URL, default `sqlite://feedback.db`
//!
//! Migrations live in `crates/admin/migrations/` and are embedded in the binary.

use bundle_kit_admin::db::MIGRATOR;

use super::{CommandError, connect};

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    MIGRATOR.run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
