//! Request store port definition.
//!
//! Durable table of download requests keyed by their deterministic id.
//! Implementations own the storage mechanics; this core only issues the
//! operations the enqueue path and the merge stream need.

use async_trait::async_trait;
use tokio::sync::watch;

use super::RepositoryError;
use crate::download::{DownloadRequest, RequestId};

/// Port for the persistent download request table.
#[async_trait]
pub trait RequestStorePort: Send + Sync {
    /// Observable over the full stored request set.
    ///
    /// Implementations publish a new value on every insert and delete. The
    /// receiver's current value is always the complete live set.
    fn observe_all(&self) -> watch::Receiver<Vec<DownloadRequest>>;

    /// Look up one stored request by id.
    async fn get(&self, id: &RequestId) -> Result<Option<DownloadRequest>, RepositoryError>;

    /// Number of stored requests with the given id.
    ///
    /// Ids are deterministic, so this is 0 or 1; it is the existence check
    /// the enqueue path runs before conflict resolution.
    async fn count(&self, id: &RequestId) -> Result<u32, RepositoryError>;

    /// Insert a request.
    async fn insert(&self, request: &DownloadRequest) -> Result<(), RepositoryError>;

    /// Delete a request.
    async fn delete(&self, request: &DownloadRequest) -> Result<(), RepositoryError>;
}
