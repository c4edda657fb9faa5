//! Transfer engine port definition.
//!
//! The engine moves the bytes. This port abstracts it behind an async API:
//! submission resolves once the engine acknowledges, batch operations take
//! job-id slices so one call covers any number of items, and the engine's
//! own queue/retry/throttle mechanics stay on its side of the boundary.

use async_trait::async_trait;

use super::EngineError;
use crate::download::{JobId, JobSpec, TransferJob};

/// Port for the transfer engine.
#[async_trait]
pub trait TransferEnginePort: Send + Sync {
    /// Submit a new job.
    ///
    /// Resolves with the engine-assigned job id once the engine acknowledges
    /// the submission, or with the engine's failure detail.
    async fn submit(&self, spec: JobSpec) -> Result<JobId, EngineError>;

    /// Snapshot of every job the engine currently tracks.
    async fn list_all(&self) -> Result<Vec<TransferJob>, EngineError>;

    /// Look up one job by engine id.
    async fn get(&self, id: JobId) -> Result<Option<TransferJob>, EngineError>;

    /// Pause the given jobs.
    async fn pause(&self, ids: &[JobId]) -> Result<(), EngineError>;

    /// Resume the given jobs.
    async fn resume(&self, ids: &[JobId]) -> Result<(), EngineError>;

    /// Cancel the given jobs.
    async fn cancel(&self, ids: &[JobId]) -> Result<(), EngineError>;

    /// Retry the given failed jobs.
    async fn retry(&self, ids: &[JobId]) -> Result<(), EngineError>;

    /// Delete the given jobs and their downloaded data.
    async fn delete(&self, ids: &[JobId]) -> Result<(), EngineError>;

    /// Forget the given jobs but keep their downloaded files.
    async fn remove(&self, ids: &[JobId]) -> Result<(), EngineError>;
}
