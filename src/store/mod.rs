//! store
//!
//! The versioned, read-only configuration store.
//!
//! # Architecture
//!
//! A [`VersionedStore`] is bound at construction to one store root, one
//! storage backend and one resolved current version. After that it holds
//! no mutable state: every query reads through to the backend.
//!
//! - `tree` - parent and children navigation
//! - `imports` - include-file import resolution
//! - `own_config` - payload lookup through the [`ConfigParser`]
//!
//! # Correctness Invariants
//!
//! 1. The current version never changes for the life of an instance
//! 2. Every location returned names a path under the version root
//! 3. Children and import targets are always containers
//! 4. Data-quality problems never fail a query; backend faults always do
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use cfgstore::core::paths::StoragePath;
//! use cfgstore::core::types::Location;
//! use cfgstore::storage::MemoryStorage;
//! use cfgstore::store::{ConfigStore, VersionedStore};
//!
//! let storage = MemoryStorage::new()
//!     .with_container("/store/1")
//!     .with_container("/store/2/teamA")
//!     .with_container("/store/2/teamB")
//!     .with_leaf("/store/2/teamA/includes", "teamB\nmissing\n")
//!     .with_leaf("/store/2/main.toml", "key = \"v\"\n");
//!
//! let store = VersionedStore::open(
//!     "memory",
//!     StoragePath::parse("/store").unwrap(),
//!     Arc::new(storage),
//! ).unwrap();
//!
//! assert_eq!(store.current_version().as_str(), "2");
//!
//! let team_a = Location::new("teamA").unwrap();
//! let imports = store.imports(Some(&team_a));
//! assert_eq!(imports, vec![Location::new("teamB").unwrap()]);
//!
//! let root = store.own_config(Some(&Location::root())).unwrap();
//! assert_eq!(root.get_str("key"), Some("v"));
//! ```

mod imports;
mod own_config;
mod tree;

pub use imports::{ImportDiagnostic, ImportResolution, TargetProblem};

use std::sync::Arc;

use thiserror::Error;

use crate::core::paths::{Layout, NodePaths, PathError, StoragePath};
use crate::core::types::{Location, Version};
use crate::core::version::{select_current_version, NumericDotPolicy, VersionPolicy};
use crate::payload::{Config, ConfigParser, ParseError, TomlParser};
use crate::storage::{Storage, StorageError};

/// Errors from store construction and queries.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store root is a leaf.
    #[error("store root '{root}' is not a container")]
    RootNotContainer { root: String },

    /// The store root could not be listed.
    #[error("store root '{root}' is unreadable: {source}")]
    RootUnreadable {
        root: String,
        #[source]
        source: StorageError,
    },

    /// No container under the store root is a valid current version.
    #[error("store root '{root}' has no valid version (candidates: {candidates:?})")]
    NoValidVersion {
        root: String,
        candidates: Vec<String>,
    },

    /// A storage path fell outside the version root.
    #[error(transparent)]
    PathOutsideVersionRoot(#[from] PathError),

    /// The backend failed on an operation expected to succeed.
    #[error("storage unavailable at '{path}': {source}")]
    StorageUnavailable {
        path: String,
        #[source]
        source: StorageError,
    },

    /// The caller passed no location where one is required.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The node's payload could not be parsed.
    #[error("invalid payload at '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: ParseError,
    },
}

impl StoreError {
    fn unavailable(path: &StoragePath, source: StorageError) -> Self {
        StoreError::StorageUnavailable {
            path: path.to_string(),
            source,
        }
    }
}

/// The public store contract, as consumed by configuration resolvers.
///
/// All queries run against the version fixed at construction. `None`
/// stands for "no location given": it has no parent, no imports and an
/// empty own config, and is an invalid argument to `children`.
pub trait ConfigStore: Send + Sync {
    /// Storage scheme this store serves.
    fn scheme(&self) -> &str;

    /// The version selected at construction.
    fn current_version(&self) -> &Version;

    /// Parent of a node; `None` for the root.
    fn parent(&self, loc: Option<&Location>) -> Result<Option<Location>, StoreError>;

    /// Child nodes (containers only), in backend listing order.
    fn children(&self, loc: Option<&Location>) -> Result<Vec<Location>, StoreError>;

    /// Declared import edges that resolve to valid nodes. Never fails.
    fn imports(&self, loc: Option<&Location>) -> Vec<Location>;

    /// The node's own, self-resolved configuration.
    fn own_config(&self, loc: Option<&Location>) -> Result<Config, StoreError>;
}

/// Construction options.
#[derive(Clone)]
pub struct StoreOptions {
    /// Ordering used to select the current version.
    pub policy: Arc<dyn VersionPolicy>,
    /// Payload parser.
    pub parser: Arc<dyn ConfigParser>,
    /// Per-node entry names.
    pub layout: Layout,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            policy: Arc::new(NumericDotPolicy),
            parser: Arc::new(TomlParser),
            layout: Layout::default(),
        }
    }
}

impl std::fmt::Debug for StoreOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreOptions")
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

/// Configuration store over one resolved version.
pub struct VersionedStore {
    scheme: String,
    store_root: StoragePath,
    version: Version,
    paths: NodePaths,
    storage: Arc<dyn Storage>,
    parser: Arc<dyn ConfigParser>,
}

impl std::fmt::Debug for VersionedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionedStore")
            .field("scheme", &self.scheme)
            .field("store_root", &self.store_root)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl VersionedStore {
    /// Open a store with default options (numeric versions, TOML payloads).
    ///
    /// # Errors
    ///
    /// - `RootNotContainer` if `root` is a leaf
    /// - `RootUnreadable` if `root` cannot be listed
    /// - `NoValidVersion` if no container under `root` is selectable
    pub fn open(
        scheme: impl Into<String>,
        root: StoragePath,
        storage: Arc<dyn Storage>,
    ) -> Result<Self, StoreError> {
        Self::open_with(scheme, root, storage, StoreOptions::default())
    }

    /// Open a store with explicit options.
    ///
    /// # Errors
    ///
    /// Same as [`open`](Self::open).
    pub fn open_with(
        scheme: impl Into<String>,
        root: StoragePath,
        storage: Arc<dyn Storage>,
        options: StoreOptions,
    ) -> Result<Self, StoreError> {
        let scheme = scheme.into();
        let version = find_current_version(storage.as_ref(), &root, options.policy.as_ref())?;
        let paths = NodePaths::new(&root, &version, options.layout);

        tracing::info!(
            scheme = %scheme,
            root = %root,
            version = %version,
            "resolved current version"
        );

        Ok(Self {
            scheme,
            store_root: root,
            version,
            paths,
            storage,
            parser: options.parser,
        })
    }

    /// Storage scheme this store serves.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The version selected at construction.
    pub fn current_version(&self) -> &Version {
        &self.version
    }

    /// Location under which all versions live.
    pub fn store_root(&self) -> &StoragePath {
        &self.store_root
    }

    /// Path routing for the current version.
    pub fn paths(&self) -> &NodePaths {
        &self.paths
    }
}

/// List the containers under `root` and let the policy pick one.
fn find_current_version(
    storage: &dyn Storage,
    root: &StoragePath,
    policy: &dyn VersionPolicy,
) -> Result<Version, StoreError> {
    let unreadable = |source| StoreError::RootUnreadable {
        root: root.to_string(),
        source,
    };

    if storage.is_leaf(root).map_err(unreadable)? {
        return Err(StoreError::RootNotContainer {
            root: root.to_string(),
        });
    }

    let mut candidates = Vec::new();
    for entry in storage.list_entries(root).map_err(unreadable)? {
        // versions are containers
        if !storage.is_container(&entry).map_err(unreadable)? {
            continue;
        }
        if let Some(name) = entry.file_name() {
            candidates.push(name.to_string());
        }
    }

    select_current_version(policy, &candidates).ok_or_else(|| StoreError::NoValidVersion {
        root: root.to_string(),
        candidates,
    })
}

impl ConfigStore for VersionedStore {
    fn scheme(&self) -> &str {
        VersionedStore::scheme(self)
    }

    fn current_version(&self) -> &Version {
        VersionedStore::current_version(self)
    }

    fn parent(&self, loc: Option<&Location>) -> Result<Option<Location>, StoreError> {
        self.parent_of(loc)
    }

    fn children(&self, loc: Option<&Location>) -> Result<Vec<Location>, StoreError> {
        self.children_of(loc)
    }

    fn imports(&self, loc: Option<&Location>) -> Vec<Location> {
        self.imports_of(loc)
    }

    fn own_config(&self, loc: Option<&Location>) -> Result<Config, StoreError> {
        self.own_config_of(loc)
    }
}
