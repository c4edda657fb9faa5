//! Download queue orchestration for trackq.
//!
//! The [`Downloader`] accepts requests to fetch tracks, persists them
//! through the request store port, hands them to the transfer engine port,
//! and reconciles the engine's live job list with the persisted set into a
//! single merged view. Out-of-band outcomes (notices, control signals)
//! surface on a conflated event stream, separate from the continuous status
//! stream.
//!
//! # Structure
//!
//! - `downloader` - The orchestrator and its enqueue pipeline
//! - `conflict` - Decision table for re-requested downloads
//! - `merge` - Engine-poll + store-watch merged items stream
//! - `events` - Capacity-1 latest-value-wins event channel
//! - `locks` - Per-request-id serialization
//! - `destination` - Filesystem destination resolver adapter

// Re-export core types for convenience
pub use trackq_core::{
    Audio, DestinationResolverPort, DownloadItem, DownloadItems, DownloadRequest, DownloaderEvent,
    EngineError, EntityType, JobId, JobSpec, JobStatus, LocationError, RepositoryError, RequestId,
    RequestStorePort, ResolveError, StorageLocation, StorageLocationPort, TransferEnginePort,
    TransferJob, UiMessage,
};

mod conflict;
mod destination;
mod downloader;
mod events;
mod locks;
mod merge;

pub use destination::FsDestinationResolver;
pub use downloader::{Downloader, DownloaderDeps};
pub use events::EventStream;
pub use merge::STATUS_REFRESH_INTERVAL;
