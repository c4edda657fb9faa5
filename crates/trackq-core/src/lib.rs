//! Core domain types and port definitions for trackq.
//!
//! This crate holds the pure domain model for the download queue (requests,
//! transfer jobs, merged items), the events published to observers, and the
//! port traits the orchestrator expects its collaborators to implement.
//! No I/O happens here; adapters live behind the ports.

pub mod domain;
pub mod download;
pub mod events;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::Audio;
pub use download::{
    DownloadItem, DownloadItems, DownloadRequest, EntityType, JobId, JobSpec, JobStatus,
    RequestId, TransferJob,
};
pub use events::{DownloaderEvent, UiMessage};
pub use ports::{
    DestinationResolverPort, EngineError, LocationError, RepositoryError, RequestStorePort,
    ResolveError, StorageLocation, StorageLocationPort, TransferEnginePort,
};
