//! Sink trait and error types
//!
//! This module defines the write surface the worker pool hands accepted pages
//! to, and the associated error type.

use crate::storage::StorageKey;
use thiserror::Error;

/// Errors that can occur while persisting a page
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to write {key}: {source}")]
    Io {
        key: String,
        source: std::io::Error,
    },

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Write task failed: {0}")]
    Task(String),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Trait for page sink implementations
///
/// A sink stores bodies verbatim under their key. Writes for distinct keys may
/// run concurrently; a write to an existing key replaces it. Implementations
/// must never leave a partially written body visible under a key.
pub trait PageSink: Send + Sync {
    /// Writes `body` under `key`, creating any containing structure
    fn write(&self, key: &StorageKey, body: &[u8]) -> PersistenceResult<()>;
}
