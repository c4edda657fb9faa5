//! Filesystem destination resolver.
//!
//! Treats the storage location as a plain directory path. The directory
//! must still exist (a saved location is useless once the folder is gone),
//! and each track lands directly under it with its sanitized file name.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use trackq_core::{Audio, DestinationResolverPort, ResolveError, StorageLocation};

/// Resolver for directory-backed storage locations.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDestinationResolver;

impl FsDestinationResolver {
    /// Create a new resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DestinationResolverPort for FsDestinationResolver {
    async fn resolve(
        &self,
        location: &StorageLocation,
        audio: &Audio,
    ) -> Result<PathBuf, ResolveError> {
        let root = Path::new(location.as_str());
        match tokio::fs::try_exists(root).await {
            Ok(true) => {}
            Ok(false) => return Err(ResolveError::NotFound(location.to_string())),
            Err(error) => return Err(ResolveError::NotFound(error.to_string())),
        }

        let file = root.join(audio.file_name());
        if let Some(parent) = file.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|error| ResolveError::Create(error.to_string()))?;
        }
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolves_under_existing_location() {
        let dir = tempfile::tempdir().unwrap();
        let location = StorageLocation::new(dir.path().to_string_lossy());
        let audio = Audio::new("t1", "Track", "Artist");

        let file = FsDestinationResolver::new()
            .resolve(&location, &audio)
            .await
            .unwrap();

        assert_eq!(file, dir.path().join("Artist - Track.mp3"));
    }

    #[tokio::test]
    async fn test_missing_location_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("missing");
        let location = StorageLocation::new(gone.to_string_lossy());
        let audio = Audio::new("t1", "Track", "Artist");

        let error = FsDestinationResolver::new()
            .resolve(&location, &audio)
            .await
            .unwrap_err();

        assert!(matches!(error, ResolveError::NotFound(_)));
    }
}
