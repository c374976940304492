//! Polls a bundle operation until it finishes.
//!
//! ```text
//! SUBMITTED ──▶ POLLING ──┬──▶ COMPLETED
//!                  ▲  │   ├──▶ FAILED
//!                  └──┘   ├──▶ TIMED_OUT   (attempts or deadline exhausted)
//!                pending  └──▶ CANCELLED   (shutdown)
//! ```
//!
//! Polls are strictly sequential: the next request is only issued after the
//! previous one returned and the interval elapsed.

use std::time::Duration;

use bundle_kit_core::BundleOperationStatus;
use tokio::time::{Instant, sleep_until, timeout_at};
use tracing::instrument;

use super::cancel::Cancellation;
use super::catalog::BundleCatalog;
use super::error::BundleError;
use crate::config::{BundleConfig, MAX_POLL_TIMEOUT};

/// Cadence and bounds for polling one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between the end of one poll and the start of the next.
    pub interval: Duration,
    /// Maximum number of polls.
    pub max_attempts: u32,
    /// Total time budget, measured from the first poll. Budgets too large to
    /// represent fall back to [`MAX_POLL_TIMEOUT`].
    pub timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::from(&BundleConfig::default())
    }
}

impl From<&BundleConfig> for PollPolicy {
    fn from(config: &BundleConfig) -> Self {
        Self {
            interval: config.poll_interval,
            max_attempts: config.poll_max_attempts,
            timeout: config.poll_timeout,
        }
    }
}

/// Poll `operation_id` until it completes, fails, or the policy runs out.
///
/// Returns the id of the created product.
///
/// # Errors
///
/// - [`BundleError::OperationFailed`] if the operation failed, or completed
///   without producing a product
/// - [`BundleError::TimedOut`] if it was still pending when the attempt or
///   time budget ran out
/// - [`BundleError::Cancelled`] if `cancel` fired
/// - [`BundleError::Shopify`] if a poll request failed
#[instrument(skip(catalog, policy, cancel))]
pub async fn poll_until_terminal<C: BundleCatalog>(
    catalog: &C,
    operation_id: &str,
    policy: &PollPolicy,
    cancel: &Cancellation,
) -> Result<String, BundleError> {
    let started = Instant::now();
    let deadline = started
        .checked_add(policy.timeout)
        .unwrap_or_else(|| started + MAX_POLL_TIMEOUT);
    let timed_out = |attempts: u32| BundleError::TimedOut {
        operation_id: operation_id.to_string(),
        attempts,
        elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
    };
    let cancelled = || BundleError::Cancelled {
        operation_id: operation_id.to_string(),
    };

    let mut attempt = 0;
    while attempt < policy.max_attempts {
        attempt += 1;

        let operation = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(cancelled()),
            polled = timeout_at(deadline, catalog.bundle_operation(operation_id)) => {
                polled.map_err(|_| timed_out(attempt))??
            }
        };

        match operation.status {
            BundleOperationStatus::Completed => {
                tracing::info!(attempt, "Bundle operation completed");
                return operation.product_id.ok_or_else(|| {
                    BundleError::OperationFailed(operation.user_errors.first().map_or_else(
                        || "operation completed without a product".to_string(),
                        |e| e.message.clone(),
                    ))
                });
            }
            BundleOperationStatus::Failed => {
                let reason = operation
                    .user_errors
                    .first()
                    .map_or_else(|| "operation failed".to_string(), |e| e.message.clone());
                tracing::warn!(attempt, %reason, "Bundle operation failed");
                return Err(BundleError::OperationFailed(reason));
            }
            BundleOperationStatus::Pending => {
                tracing::debug!(attempt, "Bundle operation pending");
            }
        }

        if attempt == policy.max_attempts {
            break;
        }
        let next_poll = match Instant::now().checked_add(policy.interval) {
            Some(next_poll) if next_poll < deadline => next_poll,
            _ => break,
        };
        tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(cancelled()),
            () = sleep_until(next_poll) => {}
        }
    }

    let err = timed_out(attempt);
    tracing::warn!(error = %err, "Gave up waiting for bundle operation");
    Err(err)
}
