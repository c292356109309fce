//! Storage abstraction for persisted annotation lists.
//!
//! The engine itself never awaits persistence: it exposes the live list
//! and the host saves it through one of these backends on its own
//! schedule. A slow or failed save can therefore never corrupt in-memory
//! state.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::annotation::Annotation;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Annotations not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Trait for annotation-list storage backends, keyed by document id.
///
/// Implementations can keep lists in memory, on the filesystem, or behind
/// a remote API; loading runs through the tolerant restore path, so
/// entries written by a newer schema are skipped rather than fatal.
pub trait Storage: Send + Sync {
    /// Save the annotation list for a document.
    fn save(&self, id: &str, annotations: &[Annotation]) -> BoxFuture<'_, StorageResult<()>>;

    /// Load the annotation list for a document.
    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Vec<Annotation>>>;

    /// Delete the stored list for a document.
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all document ids with stored annotations.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    /// Check whether a document has stored annotations.
    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}
