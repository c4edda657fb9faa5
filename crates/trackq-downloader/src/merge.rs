//! Status merge stream.
//!
//! Joins the persisted request set with the engine's live job list into the
//! grouped, ordered [`DownloadItems`] view. The engine has no push channel,
//! so it is polled on a fixed cadence; recomputation is suppressed while
//! the fetched list is structurally unchanged. The store side is push-based
//! and triggers a recompute on every insert or delete.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};

use trackq_core::{
    DownloadItem, DownloadItems, DownloadRequest, RequestStorePort, TransferEnginePort,
    TransferJob,
};

/// Engine poll cadence for the merged view.
pub const STATUS_REFRESH_INTERVAL: Duration = Duration::from_millis(1500);

/// Join requests with their jobs, newest first, grouped by entity type.
///
/// A request whose job id matches nothing in `jobs` produces an item with
/// no status: either not yet reflected by the engine, or lost across an
/// engine restart.
pub(crate) fn merge(requests: &[DownloadRequest], jobs: &[TransferJob]) -> DownloadItems {
    let mut sorted: Vec<&DownloadRequest> = requests.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut items = DownloadItems::new();
    for request in sorted {
        let job = request
            .job_id
            .and_then(|job_id| jobs.iter().find(|job| job.id == job_id).cloned());
        items
            .entry(request.entity_type)
            .or_insert_with(Vec::new)
            .push(DownloadItem::new(request.clone(), job));
    }
    items
}

/// Drive one subscription until every receiver of `tx` is gone.
///
/// The loop owns nothing but the ports and the sender, so dropping the last
/// receiver stops the polling cleanly with no dangling timer.
pub(crate) async fn run(
    store: Arc<dyn RequestStorePort>,
    engine: Arc<dyn TransferEnginePort>,
    tx: watch::Sender<DownloadItems>,
) {
    let mut store_rx = store.observe_all();
    let mut store_open = true;
    let mut jobs = engine.list_all().await.unwrap_or_default();

    {
        let requests = store_rx.borrow_and_update().clone();
        let _ = tx.send(merge(&requests, &jobs));
    }

    let mut tick = interval(STATUS_REFRESH_INTERVAL);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; the initial merge above covered it.
    tick.tick().await;

    loop {
        tokio::select! {
            () = tx.closed() => break,

            _ = tick.tick() => {
                let fetched = engine.list_all().await.unwrap_or_default();
                if fetched != jobs {
                    jobs = fetched;
                    let requests = store_rx.borrow_and_update().clone();
                    let _ = tx.send(merge(&requests, &jobs));
                }
            }

            changed = store_rx.changed(), if store_open => {
                if changed.is_ok() {
                    let requests = store_rx.borrow_and_update().clone();
                    let _ = tx.send(merge(&requests, &jobs));
                } else {
                    // Store side is gone; keep serving engine updates.
                    store_open = false;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use trackq_core::{
        Audio, EngineError, EntityType, JobId, JobSpec, JobStatus, RepositoryError, RequestId,
    };

    struct FakeStore {
        tx: watch::Sender<Vec<DownloadRequest>>,
    }

    impl FakeStore {
        fn new(requests: Vec<DownloadRequest>) -> Self {
            let (tx, _rx) = watch::channel(requests);
            Self { tx }
        }

        fn set(&self, requests: Vec<DownloadRequest>) {
            let _ = self.tx.send_replace(requests);
        }
    }

    #[async_trait]
    impl RequestStorePort for FakeStore {
        fn observe_all(&self) -> watch::Receiver<Vec<DownloadRequest>> {
            self.tx.subscribe()
        }

        async fn get(&self, id: &RequestId) -> Result<Option<DownloadRequest>, RepositoryError> {
            Ok(self.tx.borrow().iter().find(|r| &r.id == id).cloned())
        }

        async fn count(&self, id: &RequestId) -> Result<u32, RepositoryError> {
            let count = self.tx.borrow().iter().filter(|r| &r.id == id).count();
            Ok(u32::try_from(count).unwrap_or(u32::MAX))
        }

        async fn insert(&self, _request: &DownloadRequest) -> Result<(), RepositoryError> {
            Ok(())
        }

        async fn delete(&self, _request: &DownloadRequest) -> Result<(), RepositoryError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeEngine {
        jobs: Mutex<Vec<TransferJob>>,
    }

    impl FakeEngine {
        fn set(&self, jobs: Vec<TransferJob>) {
            *self.jobs.lock().unwrap() = jobs;
        }
    }

    #[async_trait]
    impl TransferEnginePort for FakeEngine {
        async fn submit(&self, _spec: JobSpec) -> Result<JobId, EngineError> {
            Err(EngineError::Unknown)
        }

        async fn list_all(&self) -> Result<Vec<TransferJob>, EngineError> {
            Ok(self.jobs.lock().unwrap().clone())
        }

        async fn get(&self, id: JobId) -> Result<Option<TransferJob>, EngineError> {
            Ok(self.jobs.lock().unwrap().iter().find(|j| j.id == id).cloned())
        }

        async fn pause(&self, _ids: &[JobId]) -> Result<(), EngineError> {
            Ok(())
        }

        async fn resume(&self, _ids: &[JobId]) -> Result<(), EngineError> {
            Ok(())
        }

        async fn cancel(&self, _ids: &[JobId]) -> Result<(), EngineError> {
            Ok(())
        }

        async fn retry(&self, _ids: &[JobId]) -> Result<(), EngineError> {
            Ok(())
        }

        async fn delete(&self, _ids: &[JobId]) -> Result<(), EngineError> {
            Ok(())
        }

        async fn remove(&self, _ids: &[JobId]) -> Result<(), EngineError> {
            Ok(())
        }
    }

    fn request(track: &str) -> DownloadRequest {
        DownloadRequest::from_audio(Audio::new(track, "Title", "Artist"))
    }

    async fn settle() {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    #[test]
    fn test_merge_joins_by_job_id() {
        let stored = request("t1").with_job_id(JobId(7));
        let job = TransferJob::new(JobId(7), JobStatus::Downloading, "/music/a.mp3");

        let items = merge(&[stored.clone()], &[job.clone()]);
        let audio_items = &items[&EntityType::Audio];
        assert_eq!(audio_items.len(), 1);
        assert_eq!(audio_items[0].job.as_ref(), Some(&job));
    }

    #[test]
    fn test_merge_keeps_unmatched_requests_without_status() {
        let stored = request("t1").with_job_id(JobId(7));

        let items = merge(&[stored], &[]);
        assert_eq!(items[&EntityType::Audio][0].job, None);
    }

    #[test]
    fn test_merge_orders_newest_first() {
        let mut older = request("t1");
        let mut newer = request("t2");
        older.created_at = chrono::Utc::now() - chrono::Duration::minutes(5);
        newer.created_at = chrono::Utc::now();

        let items = merge(&[older.clone(), newer.clone()], &[]);
        let audio_items = &items[&EntityType::Audio];
        assert_eq!(audio_items[0].request.id, newer.id);
        assert_eq!(audio_items[1].request.id, older.id);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_suppresses_unchanged_engine_polls() {
        let store = Arc::new(FakeStore::new(vec![request("t1").with_job_id(JobId(1))]));
        let engine = Arc::new(FakeEngine::default());
        let (tx, mut rx) = watch::channel(DownloadItems::new());

        let handle = tokio::spawn(run(store.clone(), engine.clone(), tx));

        // Initial merge.
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update()[&EntityType::Audio].len(), 1);

        // A tick with identical engine content must not emit.
        tokio::time::advance(STATUS_REFRESH_INTERVAL + Duration::from_millis(100)).await;
        settle().await;
        assert!(!rx.has_changed().unwrap());

        // A tick after the engine content changed must emit the join.
        engine.set(vec![TransferJob::new(JobId(1), JobStatus::Downloading, "/music/a.mp3")]);
        tokio::time::advance(STATUS_REFRESH_INTERVAL + Duration::from_millis(100)).await;
        settle().await;
        assert!(rx.has_changed().unwrap());
        let items = rx.borrow_and_update().clone();
        assert_eq!(
            items[&EntityType::Audio][0].job.as_ref().map(|j| j.status.clone()),
            Some(JobStatus::Downloading)
        );

        drop(rx);
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_recomputes_on_store_change_without_waiting_for_tick() {
        let store = Arc::new(FakeStore::new(Vec::new()));
        let engine = Arc::new(FakeEngine::default());
        let (tx, mut rx) = watch::channel(DownloadItems::new());

        let handle = tokio::spawn(run(store.clone(), engine.clone(), tx));
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_empty());

        store.set(vec![request("t1")]);
        settle().await;
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update()[&EntityType::Audio].len(), 1);

        drop(rx);
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_stops_when_last_receiver_drops() {
        let store = Arc::new(FakeStore::new(Vec::new()));
        let engine = Arc::new(FakeEngine::default());
        let (tx, rx) = watch::channel(DownloadItems::new());

        let handle = tokio::spawn(run(store, engine, tx));
        settle().await;

        drop(rx);
        handle.await.unwrap();
    }
}
