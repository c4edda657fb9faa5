//! Destination resolver port definition.

use std::path::PathBuf;

use async_trait::async_trait;

use super::{ResolveError, StorageLocation};
use crate::domain::Audio;

/// Port for planning where a track's file lands under the storage location.
///
/// Fails with [`ResolveError::NotFound`] when the location itself is no
/// longer reachable, and [`ResolveError::Create`] when the destination file
/// cannot be created under it.
#[async_trait]
pub trait DestinationResolverPort: Send + Sync {
    /// Resolve the destination file for a track.
    async fn resolve(
        &self,
        location: &StorageLocation,
        audio: &Audio,
    ) -> Result<PathBuf, ResolveError>;
}
