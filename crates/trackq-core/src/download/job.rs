//! Engine-side job types.
//!
//! The transfer engine owns these values; this core only reads them. A
//! [`TransferJob`] is a point-in-time snapshot, refetched on every poll of
//! the merge stream.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::types::JobId;

/// Status the transfer engine reports for a job.
///
/// The listed variants are the ones this core reasons about. Engines grow
/// their own states; anything an adapter cannot map lands in
/// [`JobStatus::Unrecognized`] and is handled conservatively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Known to the engine but not yet queued.
    None,
    /// Waiting in the engine's queue.
    Queued,
    /// Bytes are currently moving.
    Downloading,
    /// Paused by the user.
    Paused,
    /// Failed with an error.
    Failed,
    /// Cancelled by the user.
    Cancelled,
    /// Finished successfully.
    Completed,
    /// An engine-specific state not modeled here.
    Unrecognized(String),
}

impl JobStatus {
    /// String label for logs and messages.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::None => "none",
            Self::Queued => "queued",
            Self::Downloading => "downloading",
            Self::Paused => "paused",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
            Self::Unrecognized(label) => label,
        }
    }

    /// Whether the job ended without a usable result.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(self, Self::Failed | Self::Cancelled)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// What the orchestrator hands to the engine to start a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    /// Source URL.
    pub url: String,
    /// Destination file path under the storage location.
    pub file: PathBuf,
}

impl JobSpec {
    /// Create a new job spec.
    pub fn new(url: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            file: file.into(),
        }
    }
}

/// Snapshot of one job as the engine currently sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferJob {
    /// Engine-assigned id.
    pub id: JobId,
    /// Current status.
    pub status: JobStatus,
    /// Destination file the engine writes to.
    pub file: PathBuf,
    /// Bytes transferred so far.
    pub downloaded_bytes: u64,
    /// Total bytes, or -1 while the engine doesn't know yet.
    pub total_bytes: i64,
    /// Engine-reported error detail, if the job failed.
    pub error: Option<String>,
}

impl TransferJob {
    /// Create a snapshot with no progress yet.
    pub fn new(id: JobId, status: JobStatus, file: impl Into<PathBuf>) -> Self {
        Self {
            id,
            status,
            file: file.into(),
            downloaded_bytes: 0,
            total_bytes: -1,
            error: None,
        }
    }

    /// Progress in percent, 0.0 while the total is unknown.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress_percent(&self) -> f64 {
        if self.total_bytes > 0 {
            (self.downloaded_bytes as f64 / self.total_bytes as f64) * 100.0
        } else {
            0.0
        }
    }
}
