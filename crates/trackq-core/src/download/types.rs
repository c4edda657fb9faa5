//! Identifiers and the persisted download request.

use std::fmt;
use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::Audio;

/// Discriminates the kind of resource a request downloads.
///
/// Only audio tracks exist today; the discriminator keeps the stored shape
/// and the grouped observer view open for further kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// An audio track.
    Audio,
}

impl EntityType {
    /// Canonical string representation, also used in id derivation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Audio => "audio",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Deterministic identifier for a download request.
///
/// Derived from the resource's identity, so re-requesting the same resource
/// always produces the same id. This is what makes the existence check in
/// the enqueue path possible.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
    /// Derive the id for a resource: SHA-256 over `{entity_type}:{key}`,
    /// lowercase hex.
    #[must_use]
    pub fn derive(entity_type: EntityType, resource_key: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(entity_type.as_str().as_bytes());
        hasher.update(b":");
        hasher.update(resource_key.as_bytes());
        let digest = hasher.finalize();

        let mut hex = String::with_capacity(digest.len() * 2);
        for byte in digest {
            let _ = write!(hex, "{byte:02x}");
        }
        Self(hex)
    }

    /// The id as a hex string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier the transfer engine assigns to a job.
///
/// Distinct from [`RequestId`]: the engine owns this value and it changes
/// when a request is re-submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub i64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted intent to download one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRequest {
    /// Deterministic request id (see [`RequestId::derive`]).
    pub id: RequestId,
    /// Kind of resource this request downloads.
    pub entity_type: EntityType,
    /// The track this request was created for.
    pub audio: Audio,
    /// Engine job id, set once the request has been submitted.
    pub job_id: Option<JobId>,
    /// Creation time, used for ordering in the merged view.
    pub created_at: DateTime<Utc>,
}

impl DownloadRequest {
    /// Build a request for a track. The id is derived from the track's
    /// catalog id, so the same track always maps to the same request.
    #[must_use]
    pub fn from_audio(audio: Audio) -> Self {
        Self {
            id: RequestId::derive(EntityType::Audio, &audio.id),
            entity_type: EntityType::Audio,
            audio,
            job_id: None,
            created_at: Utc::now(),
        }
    }

    /// Attach the engine job id after a successful submission.
    #[must_use]
    pub const fn with_job_id(mut self, job_id: JobId) -> Self {
        self.job_id = Some(job_id);
        self
    }
}
