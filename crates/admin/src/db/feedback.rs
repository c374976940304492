//! Feedback repository for database operations.
//!
//! Feedback is append-only: records are inserted and counted, never updated.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

use bundle_kit_core::{FeedbackId, FeedbackKind};

use super::RepositoryError;

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for feedback queries.
#[derive(Debug, sqlx::FromRow)]
struct FeedbackRow {
    id: FeedbackId,
    kind: String,
    created_at: NaiveDateTime,
}

impl TryFrom<FeedbackRow> for FeedbackRecord {
    type Error = RepositoryError;

    fn try_from(row: FeedbackRow) -> Result<Self, Self::Error> {
        let kind = row
            .kind
            .parse()
            .map_err(|e| RepositoryError::DataCorruption(format!("feedback {}: {e}", row.id)))?;

        Ok(Self {
            id: row.id,
            kind,
            created_at: row.created_at.and_utc(),
        })
    }
}

// =============================================================================
// Public Types
// =============================================================================

/// A stored feedback entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackRecord {
    pub id: FeedbackId,
    pub kind: FeedbackKind,
    pub created_at: DateTime<Utc>,
}

/// Feedback totals per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeedbackSummary {
    pub good: u64,
    pub bad: u64,
}

impl FeedbackSummary {
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.good + self.bad
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for merchant feedback.
pub struct FeedbackRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FeedbackRepository<'a> {
    /// Create a new repository with the given pool.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Store one feedback entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn insert(&self, kind: FeedbackKind) -> Result<FeedbackRecord, RepositoryError> {
        let row = sqlx::query_as::<_, FeedbackRow>(
            r"
            INSERT INTO feedback (type) VALUES (?)
            RETURNING id, type AS kind, created_at
            ",
        )
        .bind(kind.as_str())
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Count feedback entries by kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or an unknown kind is stored.
    pub async fn count_by_kind(&self) -> Result<FeedbackSummary, RepositoryError> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            r"
            SELECT type, COUNT(*) FROM feedback
            GROUP BY type
            ",
        )
        .fetch_all(self.pool)
        .await?;

        let mut summary = FeedbackSummary::default();
        for (kind, count) in rows {
            let count = u64::try_from(count).map_err(|_| {
                RepositoryError::DataCorruption(format!("negative count for {kind}"))
            })?;
            match kind.parse::<FeedbackKind>() {
                Ok(FeedbackKind::Good) => summary.good = count,
                Ok(FeedbackKind::Bad) => summary.bad = count,
                Err(e) => return Err(RepositoryError::DataCorruption(e)),
            }
        }

        Ok(summary)
    }

    /// Most recent feedback entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_recent(&self, limit: u32) -> Result<Vec<FeedbackRecord>, RepositoryError> {
        let rows = sqlx::query_as::<_, FeedbackRow>(
            r"
            SELECT id, type AS kind, created_at FROM feedback
            ORDER BY id DESC
            LIMIT ?
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}
