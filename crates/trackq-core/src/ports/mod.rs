//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the downloader expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No database, HTTP, or platform types in any signature
//! - Errors are per-concern enums with string payloads, so adapters never
//!   leak their own error types through
//! - Intent-based methods, not generic CRUD

pub mod destination;
pub mod request_store;
pub mod storage_location;
pub mod transfer_engine;

use thiserror::Error;

// Re-export port traits for convenience
pub use destination::DestinationResolverPort;
pub use request_store::RequestStorePort;
pub use storage_location::{StorageLocation, StorageLocationPort};
pub use transfer_engine::TransferEnginePort;

/// Errors from the request store.
///
/// Abstracts away storage implementation details (database, filesystem) and
/// gives the orchestrator a clean surface to handle storage failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    /// The requested entity was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An entity with the same identifier already exists.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Storage backend error (database, filesystem, etc.).
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Errors from the transfer engine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// The engine reported a failure with its own detail.
    #[error("{0}")]
    Failed(String),

    /// The engine failed without providing any detail.
    #[error("unknown enqueue error")]
    Unknown,
}

/// Errors from the storage location provider.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LocationError {
    /// The saved value could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The saved value is not a usable location.
    #[error("Invalid location: {0}")]
    Invalid(String),
}

/// Errors from destination resolution.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// The storage location cannot be reached (deleted, unmounted, or the
    /// grant was revoked).
    #[error("Storage location not found: {0}")]
    NotFound(String),

    /// The destination file could not be created under the location.
    #[error("Could not create destination: {0}")]
    Create(String),
}
