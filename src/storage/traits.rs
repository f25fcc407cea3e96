//! storage::traits
//!
//! Storage backend trait definition.
//!
//! # Design
//!
//! The `Storage` trait is the only doorway to the hierarchical medium the
//! store reads from. It knows two kinds of entries: containers (which hold
//! other entries) and leaves (which hold bytes). It never interprets leaf
//! contents.
//!
//! # Requirements
//!
//! Implementations MUST:
//! - Be thread-safe (Send + Sync); the store is shared across threads
//! - Answer `false` (not an error) from `exists`, `is_container` and
//!   `is_leaf` for paths that do not exist
//! - Return readers that release their resources on drop
//!
//! # Example
//!
//! ```
//! use cfgstore::core::paths::StoragePath;
//! use cfgstore::storage::{MemoryStorage, Storage, StorageError};
//!
//! fn count_containers(storage: &dyn Storage, path: &StoragePath) -> Result<usize, StorageError> {
//!     let mut n = 0;
//!     for entry in storage.list_entries(path)? {
//!         if storage.is_container(&entry)? {
//!             n += 1;
//!         }
//!     }
//!     Ok(n)
//! }
//!
//! let storage = MemoryStorage::new()
//!     .with_container("/store/1")
//!     .with_leaf("/store/README", "hi");
//! let root = StoragePath::parse("/store").unwrap();
//! assert_eq!(count_containers(&storage, &root).unwrap(), 1);
//! ```

use std::io::Read;

use thiserror::Error;

use crate::core::paths::StoragePath;

/// Errors from storage backend operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No entry at the given path.
    #[error("no such entry: {0}")]
    NotFound(String),

    /// A container was required.
    #[error("not a container: {0}")]
    NotAContainer(String),

    /// A leaf was required.
    #[error("not a leaf: {0}")]
    NotALeaf(String),

    /// Underlying I/O failure.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    pub(crate) fn io(path: &StoragePath, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.to_string(),
            source,
        }
    }
}

/// Byte stream over a leaf entry. Dropping it releases the handle.
pub type LeafReader<'a> = Box<dyn Read + Send + 'a>;

/// Trait for hierarchical storage backends.
///
/// All paths are absolute [`StoragePath`]s in the backend's own namespace.
pub trait Storage: Send + Sync {
    /// Whether any entry exists at `path`.
    fn exists(&self, path: &StoragePath) -> Result<bool, StorageError>;

    /// Whether `path` exists and is a container.
    fn is_container(&self, path: &StoragePath) -> Result<bool, StorageError>;

    /// Whether `path` exists and is a leaf.
    fn is_leaf(&self, path: &StoragePath) -> Result<bool, StorageError>;

    /// Immediate entries of a container.
    ///
    /// Returns `StorageError::NotFound` for a missing path and
    /// `StorageError::NotAContainer` for a leaf.
    fn list_entries(&self, path: &StoragePath) -> Result<Vec<StoragePath>, StorageError>;

    /// Open a leaf for reading.
    ///
    /// Returns `StorageError::NotFound` for a missing path and
    /// `StorageError::NotALeaf` for a container.
    fn open_read(&self, path: &StoragePath) -> Result<LeafReader<'_>, StorageError>;
}
