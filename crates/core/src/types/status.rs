//! Status and kind enums.

use serde::{Deserialize, Serialize};

/// Merchant feedback on the app: thumbs up or thumbs down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    Good,
    Bad,
}

impl FeedbackKind {
    /// All kinds, in display order.
    pub const ALL: [Self; 2] = [Self::Good, Self::Bad];

    /// Storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Bad => "bad",
        }
    }
}

impl std::fmt::Display for FeedbackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FeedbackKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "good" => Ok(Self::Good),
            "bad" => Ok(Self::Bad),
            _ => Err(format!("invalid feedback type: {s}")),
        }
    }
}

/// Observed state of an asynchronous bundle operation.
///
/// Transitions are owned by Shopify; this side only observes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BundleOperationStatus {
    /// Queued or running (`CREATED` / `ACTIVE`).
    Pending,
    /// Finished (`COMPLETE`).
    Completed,
    /// Finished unsuccessfully.
    Failed,
}

impl BundleOperationStatus {
    /// Map a raw Shopify status string.
    ///
    /// Returns `None` for values this client does not know about; callers
    /// keep polling in that case.
    #[must_use]
    pub fn from_shopify(raw: &str) -> Option<Self> {
        match raw {
            "CREATED" | "ACTIVE" | "PENDING" => Some(Self::Pending),
            "COMPLETE" | "COMPLETED" => Some(Self::Completed),
            "FAILED" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Whether no further transitions can happen.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}
