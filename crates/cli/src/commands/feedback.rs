//! Feedback report commands.
//!
//! # Usage
//!
//! ```bash
//! # Totals per feedback type
//! bk-cli feedback summary
//!
//! # Same, as JSON
//! bk-cli feedback summary --json
//!
//! # Most recent entries
//! bk-cli feedback recent -l 20
//! ```

use bundle_kit_admin::db::{FeedbackRecord, FeedbackRepository, FeedbackSummary};

use super::{CommandError, connect};

/// Print good/bad totals.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn summary(json: bool) -> Result<(), CommandError> {
    let pool = connect().await?;
    let summary = FeedbackRepository::new(&pool).count_by_kind().await?;

    #[allow(clippy::print_stdout)]
    {
        if json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            println!("{}", format_summary(&summary));
        }
    }
    Ok(())
}

/// Print the most recent feedback entries, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn recent(limit: u32) -> Result<(), CommandError> {
    let pool = connect().await?;
    let records = FeedbackRepository::new(&pool).list_recent(limit).await?;

    #[allow(clippy::print_stdout)]
    for record in &records {
        println!("{}", format_record(record));
    }
    Ok(())
}

fn format_summary(summary: &FeedbackSummary) -> String {
    format!(
        "good: {}\nbad:  {}\ntotal: {}",
        summary.good,
        summary.bad,
        summary.total()
    )
}

fn format_record(record: &FeedbackRecord) -> String {
    format!(
        "#{:<6} {:<4} {}",
        record.id.as_i64(),
        record.kind.as_str(),
        record.created_at.format("%Y-%m-%d %H:%M:%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_summary() {
        let summary = FeedbackSummary { good: 3, bad: 1 };
        assert_eq!(format_summary(&summary), "good: 3\nbad:  1\ntotal: 4");
    }
}
