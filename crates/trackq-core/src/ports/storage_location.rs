//! Storage location provider port definition.
//!
//! The location is an opaque reference to where completed files are written.
//! It may be unset, set but no longer authorized, or set and authorized; the
//! provider owns persistence and the permission grant behind it.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::LocationError;

/// Opaque reference to the downloads destination.
///
/// The orchestrator never interprets the value; only the provider and the
/// destination resolver do.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StorageLocation(String);

impl StorageLocation {
    /// Wrap a raw location value.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw location value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Port for reading and persisting the downloads location.
#[async_trait]
pub trait StorageLocationPort: Send + Sync {
    /// The currently saved location, if any.
    async fn get(&self) -> Result<Option<StorageLocation>, LocationError>;

    /// Persist a new location.
    async fn save(&self, location: &StorageLocation) -> Result<(), LocationError>;

    /// Whether the grant for this location is still readable and writable.
    async fn is_authorized(&self, location: &StorageLocation) -> Result<bool, LocationError>;
}
