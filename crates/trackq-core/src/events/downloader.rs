//! Downloader events - out-of-band notices distinct from the status stream.
//!
//! These are transient, UI-directed values: a subscriber shows the latest one
//! (toast, banner) or reacts to a control signal. They are not a log; an
//! unconsumed event may be replaced by a newer one.

use serde::{Deserialize, Serialize};

use crate::download::JobStatus;

/// A human-facing notice with a severity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "severity", rename_all = "snake_case")]
pub enum UiMessage {
    /// Informational notice.
    Info {
        /// Human-readable text.
        text: String,
    },
    /// Error notice.
    Error {
        /// Human-readable text.
        text: String,
    },
}

impl UiMessage {
    /// Create an informational message.
    pub fn info(text: impl Into<String>) -> Self {
        Self::Info { text: text.into() }
    }

    /// Create an error message.
    pub fn error(text: impl Into<String>) -> Self {
        Self::Error { text: text.into() }
    }

    /// The message text.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Info { text } | Self::Error { text } => text,
        }
    }

    /// Whether this message reports an error.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Notice catalog
    // ─────────────────────────────────────────────────────────────────────

    /// The track was handed to the transfer engine.
    #[must_use]
    pub fn download_queued() -> Self {
        Self::info("Download queued")
    }

    /// A request for this track is already waiting or running.
    #[must_use]
    pub fn already_queued() -> Self {
        Self::info("Track is already queued for download")
    }

    /// The track finished downloading earlier and the file is still there.
    #[must_use]
    pub fn already_completed() -> Self {
        Self::info("Track is already downloaded")
    }

    /// A paused download for this track was resumed instead of re-queued.
    #[must_use]
    pub fn resuming_existing() -> Self {
        Self::info("Resuming the existing download")
    }

    /// The destination file could not be created.
    #[must_use]
    pub fn file_create_error() -> Self {
        Self::error("Could not create the destination file")
    }

    /// The track has no usable source URL.
    #[must_use]
    pub fn invalid_source_url() -> Self {
        Self::error("Track has no valid download link")
    }

    /// The saved downloads folder no longer exists.
    #[must_use]
    pub fn storage_folder_not_found() -> Self {
        Self::error("Downloads folder was not found")
    }

    /// An existing download for this track is in a state the enqueue path
    /// doesn't handle.
    #[must_use]
    pub fn existing_unknown_status(status: &JobStatus) -> Self {
        Self::info(format!("Existing download is in an unhandled state: {status}"))
    }
}

/// Single discriminated union for everything the downloader reports out of
/// band: UI notices plus the two control signals a subscriber must act on to
/// unblock a deferred enqueue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DownloaderEvent {
    /// The user must pick a downloads location before anything can enqueue.
    ChooseStorageLocation,

    /// The saved downloads location is no longer readable and writable.
    StorageLocationPermissionError,

    /// A UI-facing notice about an enqueue outcome.
    Message {
        /// The notice to show.
        message: UiMessage,
    },
}

impl DownloaderEvent {
    /// Wrap a notice in an event.
    #[must_use]
    pub const fn message(message: UiMessage) -> Self {
        Self::Message { message }
    }

    /// The carried notice, if this event is one.
    #[must_use]
    pub const fn as_message(&self) -> Option<&UiMessage> {
        match self {
            Self::Message { message } => Some(message),
            _ => None,
        }
    }

    /// Event name for wire protocols.
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::ChooseStorageLocation => "downloader:choose_storage_location",
            Self::StorageLocationPermissionError => "downloader:storage_location_permission_error",
            Self::Message { .. } => "downloader:message",
        }
    }
}
