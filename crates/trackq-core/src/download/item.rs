//! The merged projection exposed to observers.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::job::TransferJob;
use super::types::{DownloadRequest, EntityType, JobId};

/// The grouped view observers subscribe to: per resource kind, the items
/// ordered by descending creation time.
pub type DownloadItems = IndexMap<EntityType, Vec<DownloadItem>>;

/// One download as shown to observers: the persisted request joined with the
/// engine's current view of its job.
///
/// Computed fresh on every merge tick; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadItem {
    /// The persisted request.
    pub request: DownloadRequest,
    /// The engine's job snapshot. Absent when the engine has no record for
    /// the request (not yet submitted, or lost across an engine restart).
    pub job: Option<TransferJob>,
}

impl DownloadItem {
    /// Join a request with its (possibly absent) engine job.
    #[must_use]
    pub const fn new(request: DownloadRequest, job: Option<TransferJob>) -> Self {
        Self { request, job }
    }

    /// The engine job id, from the live job if present, else from the
    /// persisted request.
    #[must_use]
    pub fn job_id(&self) -> Option<JobId> {
        self.job.as_ref().map_or(self.request.job_id, |job| Some(job.id))
    }
}
