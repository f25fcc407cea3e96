//! storage
//!
//! Hierarchical storage abstraction the configuration store reads from.
//!
//! # Architecture
//!
//! The store only touches storage through the `Storage` trait, which has
//! multiple implementations:
//!
//! - [`LocalStorage`]: local filesystem (scheme `file`, default)
//! - [`MemoryStorage`]: in-memory tree with failure injection (scheme `memory`)
//!
//! # Provider Selection
//!
//! Use [`create_storage`] to create a backend from a scheme name:
//!
//! ```
//! use cfgstore::storage::create_storage;
//!
//! let storage = create_storage("file").unwrap();
//! assert!(create_storage("ftp").is_err());
//! ```

mod local;
mod memory;
mod traits;

use std::sync::Arc;

pub use local::LocalStorage;
pub use memory::{FailOn, MemoryStorage};
pub use traits::{LeafReader, Storage, StorageError};

/// The default storage scheme.
pub const DEFAULT_SCHEME: &str = "file";

/// Scheme names accepted by [`create_storage`].
pub fn valid_schemes() -> &'static [&'static str] {
    &["file", "memory"]
}

/// Schemes whose data lives outside the process.
///
/// A `memory` backend created by name starts empty, so only these can be
/// named in settings files and on the command line.
pub fn external_schemes() -> &'static [&'static str] {
    &["file"]
}

/// Errors from backend selection.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown storage scheme '{scheme}' (valid: {valid})")]
pub struct UnknownScheme {
    pub scheme: String,
    pub valid: String,
}

/// Create a storage backend for a scheme.
///
/// # Schemes
///
/// - `"file"`: [`LocalStorage`] rooted at `/`
/// - `"memory"`: an empty [`MemoryStorage`]
///
/// # Errors
///
/// Returns [`UnknownScheme`] for any other name.
pub fn create_storage(scheme: &str) -> Result<Arc<dyn Storage>, UnknownScheme> {
    match scheme {
        "file" => Ok(Arc::new(LocalStorage::new())),
        "memory" => Ok(Arc::new(MemoryStorage::new())),
        other => Err(UnknownScheme {
            scheme: other.to_string(),
            valid: valid_schemes().join(", "),
        }),
    }
}
