//! The downloader orchestrator.
//!
//! Owns the enqueue pipeline (storage-location precondition, conflict
//! resolution, engine submission, store update), the single pending-track
//! slot used while no location is available, pass-through job control, and
//! the merged items stream.
//!
//! One instance per application session; every collaborator is injected as
//! a port, so the orchestrator holds no platform state of its own.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};

use trackq_core::{
    Audio, DestinationResolverPort, DownloadItem, DownloadItems, DownloadRequest, DownloaderEvent,
    JobId, JobSpec, RequestStorePort, ResolveError, StorageLocation, StorageLocationPort,
    TransferEnginePort, UiMessage,
};

use crate::conflict;
use crate::events::{EventSender, EventStream};
use crate::locks::RequestLocks;
use crate::merge;

/// Dependencies for constructing a [`Downloader`].
pub struct DownloaderDeps {
    /// Durable table of download requests.
    pub store: Arc<dyn RequestStorePort>,
    /// The byte-moving engine.
    pub engine: Arc<dyn TransferEnginePort>,
    /// Storage location persistence and authorization.
    pub locations: Arc<dyn StorageLocationPort>,
    /// Destination planning under the storage location.
    pub resolver: Arc<dyn DestinationResolverPort>,
}

/// Download queue orchestrator.
pub struct Downloader {
    store: Arc<dyn RequestStorePort>,
    engine: Arc<dyn TransferEnginePort>,
    locations: Arc<dyn StorageLocationPort>,
    resolver: Arc<dyn DestinationResolverPort>,
    events: EventSender,
    /// Track waiting for a storage location. A newer deferral replaces an
    /// older one; only the most recent survives.
    pending: Mutex<Option<Audio>>,
    locks: RequestLocks,
}

impl Downloader {
    /// Create a new downloader over the given collaborators.
    #[must_use]
    pub fn new(deps: DownloaderDeps) -> Self {
        Self {
            store: deps.store,
            engine: deps.engine,
            locations: deps.locations,
            resolver: deps.resolver,
            events: EventSender::new(),
            pending: Mutex::new(None),
            locks: RequestLocks::new(),
        }
    }

    /// Subscribe to out-of-band downloader events.
    ///
    /// The channel holds one event and the latest value wins; see
    /// [`EventStream`].
    #[must_use]
    pub fn events(&self) -> EventStream {
        self.events.subscribe()
    }

    /// Subscribe to the merged download items view.
    ///
    /// Each subscription drives its own engine poll loop; dropping the
    /// receiver stops that loop.
    #[must_use]
    pub fn download_items(&self) -> watch::Receiver<DownloadItems> {
        let (tx, rx) = watch::channel(DownloadItems::new());
        tokio::spawn(merge::run(
            Arc::clone(&self.store),
            Arc::clone(&self.engine),
            tx,
        ));
        rx
    }

    /// The track currently waiting for a storage location, if any.
    pub async fn pending_enqueue(&self) -> Option<Audio> {
        self.pending.lock().await.clone()
    }

    /// Try to enqueue a track for download.
    ///
    /// Fire-and-forget: outcomes surface exclusively on the event stream,
    /// never as a return value, because the call site is typically a UI
    /// action that cannot block on one.
    pub async fn enqueue_audio(&self, audio: Audio) {
        let Some(location) = self.authorized_location(&audio).await else {
            return;
        };

        let request = DownloadRequest::from_audio(audio);
        let guard = self.locks.acquire(&request.id).await;
        self.enqueue_with_location(request, &location).await;
        drop(guard);
        self.locks.shrink().await;
    }

    /// Persist a new downloads location, then retry the deferred track if
    /// one is waiting.
    pub async fn set_storage_location(&self, location: StorageLocation) {
        tracing::info!(location = %location, "Setting new downloads location");
        if let Err(error) = self.locations.save(&location).await {
            tracing::error!(error = %error, "Failed to persist the downloads location");
            self.events
                .publish(DownloaderEvent::message(UiMessage::error(error.to_string())));
            return;
        }

        // Take the slot before retrying so a re-deferral inside the retry
        // can't observe its own track still pending.
        let pending = self.pending.lock().await.take();
        if let Some(audio) = pending {
            self.enqueue_audio(audio).await;
        }
    }

    /// Pause the given items' engine jobs with a single batched call.
    pub async fn pause(&self, items: &[DownloadItem]) {
        let ids = job_ids(items);
        if ids.is_empty() {
            return;
        }
        if let Err(error) = self.engine.pause(&ids).await {
            tracing::warn!(error = %error, "Engine pause failed");
        }
    }

    /// Resume the given items' engine jobs with a single batched call.
    pub async fn resume(&self, items: &[DownloadItem]) {
        let ids = job_ids(items);
        if ids.is_empty() {
            return;
        }
        if let Err(error) = self.engine.resume(&ids).await {
            tracing::warn!(error = %error, "Engine resume failed");
        }
    }

    /// Cancel the given items' engine jobs with a single batched call.
    pub async fn cancel(&self, items: &[DownloadItem]) {
        let ids = job_ids(items);
        if ids.is_empty() {
            return;
        }
        if let Err(error) = self.engine.cancel(&ids).await {
            tracing::warn!(error = %error, "Engine cancel failed");
        }
    }

    /// Retry the given items' failed engine jobs with a single batched call.
    pub async fn retry(&self, items: &[DownloadItem]) {
        let ids = job_ids(items);
        if ids.is_empty() {
            return;
        }
        if let Err(error) = self.engine.retry(&ids).await {
            tracing::warn!(error = %error, "Engine retry failed");
        }
    }

    /// Forget the items: engine jobs are removed but their files kept, and
    /// the store records deleted.
    ///
    /// Store cleanup is best-effort and runs even when the engine call
    /// fails; a dangling engine job resurfaces on the next merge tick,
    /// while a dangling store row would resurrect a dead item forever.
    pub async fn remove(&self, items: &[DownloadItem]) {
        let ids = job_ids(items);
        if !ids.is_empty() {
            if let Err(error) = self.engine.remove(&ids).await {
                tracing::warn!(error = %error, "Engine remove failed, cleaning the store anyway");
            }
        }
        self.delete_requests(items).await;
    }

    /// Delete the items: engine jobs including their files, plus the store
    /// records. Same best-effort policy as [`Downloader::remove`].
    pub async fn delete(&self, items: &[DownloadItem]) {
        let ids = job_ids(items);
        if !ids.is_empty() {
            if let Err(error) = self.engine.delete(&ids).await {
                tracing::warn!(error = %error, "Engine delete failed, cleaning the store anyway");
            }
        }
        self.delete_requests(items).await;
    }

    // ─────────────────────────────────────────────────────────────────────
    // Enqueue pipeline
    // ─────────────────────────────────────────────────────────────────────

    /// Resolve a usable storage location, or report what blocks it.
    ///
    /// Only a fully missing location defers the track; a permission failure
    /// emits the control signal and leaves the pending slot alone.
    async fn authorized_location(&self, audio: &Audio) -> Option<StorageLocation> {
        match self.locations.get().await {
            Ok(Some(location)) => match self.locations.is_authorized(&location).await {
                Ok(true) => Some(location),
                Ok(false) => {
                    tracing::warn!(location = %location, "Downloads location is no longer authorized");
                    self.events
                        .publish(DownloaderEvent::StorageLocationPermissionError);
                    None
                }
                Err(error) => {
                    tracing::warn!(error = %error, "Could not verify the downloads location grant");
                    self.events
                        .publish(DownloaderEvent::StorageLocationPermissionError);
                    None
                }
            },
            Ok(None) => {
                self.defer(audio).await;
                self.events.publish(DownloaderEvent::ChooseStorageLocation);
                None
            }
            Err(error) => {
                tracing::warn!(error = %error, "Could not read the downloads location, treating as unset");
                self.defer(audio).await;
                self.events.publish(DownloaderEvent::ChooseStorageLocation);
                None
            }
        }
    }

    /// Park a track in the pending slot, replacing any earlier one.
    async fn defer(&self, audio: &Audio) {
        *self.pending.lock().await = Some(audio.clone());
    }

    async fn enqueue_with_location(&self, request: DownloadRequest, location: &StorageLocation) {
        let exists = match self.store.count(&request.id).await {
            Ok(count) => count > 0,
            Err(error) => {
                tracing::warn!(id = %request.id, error = %error, "Existence check failed, assuming new request");
                false
            }
        };
        if exists
            && !conflict::resolve_existing(
                &request,
                self.store.as_ref(),
                self.engine.as_ref(),
                &self.events,
            )
            .await
        {
            return;
        }

        let file = match self.resolver.resolve(location, &request.audio).await {
            Ok(file) => file,
            Err(ResolveError::NotFound(detail)) => {
                tracing::warn!(error = %detail, "Downloads folder is gone, asking for a new location");
                self.defer(&request.audio).await;
                self.events
                    .publish(DownloaderEvent::message(UiMessage::storage_folder_not_found()));
                self.events.publish(DownloaderEvent::ChooseStorageLocation);
                return;
            }
            Err(error) => {
                tracing::error!(error = %error, "Error while creating the track file");
                self.events
                    .publish(DownloaderEvent::message(UiMessage::file_create_error()));
                return;
            }
        };

        let Some(url) = request.audio.download_url.clone() else {
            self.events
                .publish(DownloaderEvent::message(UiMessage::invalid_source_url()));
            return;
        };

        match self.engine.submit(JobSpec::new(url, file)).await {
            Ok(job_id) => {
                tracing::info!(id = %request.id, job = %job_id, "Successfully enqueued track for download");
                if let Err(error) = self.store.insert(&request.with_job_id(job_id)).await {
                    // The engine job stays alive: losing an in-flight
                    // transfer is worse than a record the store must
                    // reconcile later.
                    tracing::error!(error = %error, "Failed to persist download request");
                    self.events
                        .publish(DownloaderEvent::message(UiMessage::error(error.to_string())));
                }
                self.events
                    .publish(DownloaderEvent::message(UiMessage::download_queued()));
            }
            Err(error) => {
                tracing::error!(error = %error, "Failed to enqueue track for download");
                self.events
                    .publish(DownloaderEvent::message(UiMessage::error(error.to_string())));
            }
        }
    }

    async fn delete_requests(&self, items: &[DownloadItem]) {
        for item in items {
            if let Err(error) = self.store.delete(&item.request).await {
                tracing::warn!(id = %item.request.id, error = %error, "Failed to delete download request");
            }
        }
    }
}

/// Collect the engine job ids of the given items.
fn job_ids(items: &[DownloadItem]) -> Vec<JobId> {
    items.iter().filter_map(DownloadItem::job_id).collect()
}
