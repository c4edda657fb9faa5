//! Conflict resolution for re-requested downloads.
//!
//! Decides what happens when a new request's id already exists in the
//! store. The decision table itself is pure; [`resolve_existing`] fetches
//! the inputs and applies the side effects.

use trackq_core::{
    DownloadRequest, DownloaderEvent, JobStatus, RequestStorePort, TransferEnginePort,
    TransferJob, UiMessage,
};

use crate::events::EventSender;

/// Outcome of the decision table for one existing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ConflictDecision {
    /// The old attempt is stale or unusable: clean it up and enqueue anew.
    Supersede {
        /// Whether an engine job exists that must be deleted as well.
        delete_job: bool,
    },
    /// A paused job exists: resume it instead of enqueuing a duplicate.
    Resume,
    /// The request is already waiting or running.
    AlreadyQueued,
    /// The request completed earlier and its file is still present.
    AlreadyCompleted,
    /// The existing job is in a state this table doesn't model.
    UnknownStatus,
}

/// The decision table, keyed on the existing job's status and, for
/// completed jobs, whether the output file is still present.
///
/// Terminal failure states are fully retriable; in-flight or successful
/// work must not be duplicated; a completed download whose file vanished is
/// treated as if it never completed.
pub(crate) fn decide(status: Option<&JobStatus>, output_present: bool) -> ConflictDecision {
    match status {
        // The request row exists but the engine has no job for it: stale
        // record, typically left over from a crash.
        None => ConflictDecision::Supersede { delete_job: false },
        Some(JobStatus::Failed | JobStatus::Cancelled) => {
            ConflictDecision::Supersede { delete_job: true }
        }
        Some(JobStatus::Paused) => ConflictDecision::Resume,
        Some(JobStatus::None | JobStatus::Queued) => ConflictDecision::AlreadyQueued,
        Some(JobStatus::Completed) => {
            if output_present {
                ConflictDecision::AlreadyCompleted
            } else {
                ConflictDecision::Supersede { delete_job: true }
            }
        }
        Some(_) => ConflictDecision::UnknownStatus,
    }
}

/// Resolve a collision between `new_request` and the stored request with
/// the same id. Returns `true` when the new enqueue may proceed.
pub(crate) async fn resolve_existing(
    new_request: &DownloadRequest,
    store: &dyn RequestStorePort,
    engine: &dyn TransferEnginePort,
    events: &EventSender,
) -> bool {
    let Ok(Some(old_request)) = store.get(&new_request.id).await else {
        // The existence check raced a delete; nothing left to conflict with.
        return true;
    };

    let job = match old_request.job_id {
        Some(job_id) => engine.get(job_id).await.ok().flatten(),
        None => None,
    };

    let output_present = match &job {
        Some(job) if job.status == JobStatus::Completed => {
            // An unreadable path counts as missing.
            tokio::fs::try_exists(&job.file).await.unwrap_or(false)
        }
        _ => false,
    };

    let decision = decide(job.as_ref().map(|job| &job.status), output_present);
    apply(&decision, &old_request, job.as_ref(), store, engine, events).await
}

/// Apply a decision's side effects and notification.
async fn apply(
    decision: &ConflictDecision,
    old_request: &DownloadRequest,
    job: Option<&TransferJob>,
    store: &dyn RequestStorePort,
    engine: &dyn TransferEnginePort,
    events: &EventSender,
) -> bool {
    match decision {
        ConflictDecision::Supersede { delete_job } => {
            if *delete_job {
                if let Some(job) = job {
                    if let Err(error) = engine.delete(&[job.id]).await {
                        tracing::warn!(id = %old_request.id, error = %error, "Failed to delete superseded job");
                    }
                }
            }
            if let Err(error) = store.delete(old_request).await {
                tracing::warn!(id = %old_request.id, error = %error, "Failed to delete superseded request");
            }
            tracing::info!(id = %old_request.id, "Old download attempt is dead, allowing enqueue");
            true
        }
        ConflictDecision::Resume => {
            if let Some(job) = job {
                if let Err(error) = engine.resume(&[job.id]).await {
                    tracing::warn!(id = %old_request.id, error = %error, "Failed to resume paused job");
                }
            }
            tracing::info!(id = %old_request.id, "Resuming paused download because of new request");
            events.publish(DownloaderEvent::message(UiMessage::resuming_existing()));
            false
        }
        ConflictDecision::AlreadyQueued => {
            tracing::debug!(id = %old_request.id, "Track already queued, doing nothing");
            events.publish(DownloaderEvent::message(UiMessage::already_queued()));
            false
        }
        ConflictDecision::AlreadyCompleted => {
            tracing::debug!(id = %old_request.id, "Track already downloaded and file exists, doing nothing");
            events.publish(DownloaderEvent::message(UiMessage::already_completed()));
            false
        }
        ConflictDecision::UnknownStatus => {
            let status = job.map_or(JobStatus::None, |job| job.status.clone());
            tracing::debug!(id = %old_request.id, status = %status, "Existing download in unhandled status, doing nothing");
            events.publish(DownloaderEvent::message(UiMessage::existing_unknown_status(
                &status,
            )));
            false
        }
    }
}
