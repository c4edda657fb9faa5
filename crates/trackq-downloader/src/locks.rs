//! Per-request serialization.
//!
//! One async mutex per request id, held across the conflict check, engine
//! submission, and store insert. Two concurrent enqueues of the same track
//! therefore serialize: the second one runs its existence check only after
//! the first has persisted (or abandoned) its request.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use trackq_core::RequestId;

/// Registry of per-request-id guards.
#[derive(Debug, Default)]
pub(crate) struct RequestLocks {
    entries: Mutex<HashMap<RequestId, Arc<Mutex<()>>>>,
}

impl RequestLocks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Acquire the guard for one request id, creating it on first use.
    pub(crate) async fn acquire(&self, id: &RequestId) -> OwnedMutexGuard<()> {
        let entry = {
            let mut entries = self.entries.lock().await;
            Arc::clone(entries.entry(id.clone()).or_default())
        };
        entry.lock_owned().await
    }

    /// Drop entries nobody holds or waits on. Call after releasing a guard
    /// to keep the registry bounded by the number of in-flight enqueues.
    pub(crate) async fn shrink(&self) {
        let mut entries = self.entries.lock().await;
        entries.retain(|_, entry| Arc::strong_count(entry) > 1);
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trackq_core::EntityType;

    fn id(key: &str) -> RequestId {
        RequestId::derive(EntityType::Audio, key)
    }

    #[tokio::test]
    async fn test_same_id_serializes() {
        let locks = Arc::new(RequestLocks::new());

        let guard = locks.acquire(&id("t1")).await;

        let contender = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.acquire(&id("t1")).await;
            })
        };

        // The contender cannot finish while the first guard is held.
        tokio::task::yield_now().await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap();
    }

    #[tokio::test]
    async fn test_different_ids_are_independent() {
        let locks = RequestLocks::new();

        let _first = locks.acquire(&id("t1")).await;
        // Must not deadlock.
        let _second = locks.acquire(&id("t2")).await;
    }

    #[tokio::test]
    async fn test_shrink_drops_released_entries() {
        let locks = RequestLocks::new();

        let guard = locks.acquire(&id("t1")).await;
        locks.shrink().await;
        // Held entries survive.
        assert_eq!(locks.len().await, 1);

        drop(guard);
        locks.shrink().await;
        assert_eq!(locks.len().await, 0);
    }
}
