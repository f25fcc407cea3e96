//! storage::memory
//!
//! In-memory storage backend for deterministic testing and embedding.
//!
//! # Design
//!
//! The memory backend keeps a tree of containers and leaves in a map keyed
//! by [`StoragePath`]. Inserting an entry creates its missing ancestors as
//! containers. Failures can be injected per path with [`FailOn`], and the
//! number of live readers is tracked so tests can verify that every
//! reader handed out was released.
//!
//! # Example
//!
//! ```
//! use std::io::Read;
//! use cfgstore::core::paths::StoragePath;
//! use cfgstore::storage::{MemoryStorage, Storage};
//!
//! let storage = MemoryStorage::new()
//!     .with_container("/store/1/teamA")
//!     .with_leaf("/store/1/main.toml", "key = \"v\"\n");
//!
//! let leaf = StoragePath::parse("/store/1/main.toml").unwrap();
//! let mut text = String::new();
//! storage.open_read(&leaf).unwrap().read_to_string(&mut text).unwrap();
//! assert_eq!(text, "key = \"v\"\n");
//! assert_eq!(storage.open_readers(), 0);
//! ```

use std::collections::BTreeMap;
use std::io::{self, Cursor, Read};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::traits::{LeafReader, Storage, StorageError};
use crate::core::paths::StoragePath;

/// One stored entry.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Container,
    Leaf(Vec<u8>),
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailOn {
    /// Fail `exists`, `is_container` and `is_leaf` at this path.
    Stat(StoragePath),
    /// Fail `list_entries` at this path.
    List(StoragePath),
    /// Fail `open_read` at this path.
    Open(StoragePath),
    /// Open succeeds but the first read from the stream fails.
    Read(StoragePath),
}

/// Internal mutable state.
#[derive(Debug, Default)]
struct MemoryInner {
    entries: BTreeMap<StoragePath, Entry>,
    fail_on: Vec<FailOn>,
    total_opens: usize,
}

/// In-memory storage.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<MemoryInner>>,
    open_readers: Arc<AtomicUsize>,
}

fn injected(path: &StoragePath, op: &str) -> StorageError {
    StorageError::io(
        path,
        io::Error::new(io::ErrorKind::Other, format!("injected {op} failure")),
    )
}

impl MemoryStorage {
    /// Create an empty storage. The root `/` always exists as a container.
    pub fn new() -> Self {
        Self::default()
    }

    fn inner(&self) -> MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a container, creating missing ancestors.
    ///
    /// Replaces a leaf at the same path.
    pub fn insert_container(&self, path: &StoragePath) {
        let mut inner = self.inner();
        Self::insert_ancestors(&mut inner, path);
        inner.entries.insert(path.clone(), Entry::Container);
    }

    /// Insert a leaf, creating missing ancestors.
    ///
    /// Replaces any entry at the same path.
    pub fn insert_leaf(&self, path: &StoragePath, content: impl Into<Vec<u8>>) {
        let mut inner = self.inner();
        Self::insert_ancestors(&mut inner, path);
        inner.entries.insert(path.clone(), Entry::Leaf(content.into()));
    }

    /// Remove an entry and everything below it.
    pub fn remove(&self, path: &StoragePath) {
        let mut inner = self.inner();
        inner
            .entries
            .retain(|p, _| p != path && !path.is_ancestor_of(p));
    }

    fn insert_ancestors(inner: &mut MemoryInner, path: &StoragePath) {
        let mut current = path.parent();
        while let Some(p) = current {
            if p.is_root() {
                break;
            }
            inner.entries.insert(p.clone(), Entry::Container);
            current = p.parent();
        }
    }

    /// Builder form of [`insert_container`](Self::insert_container).
    ///
    /// # Panics
    ///
    /// Panics if `raw` is not a valid storage path.
    pub fn with_container(self, raw: &str) -> Self {
        let path = StoragePath::parse(raw)
            .unwrap_or_else(|e| panic!("invalid storage path in fixture: {e}"));
        self.insert_container(&path);
        self
    }

    /// Builder form of [`insert_leaf`](Self::insert_leaf).
    ///
    /// # Panics
    ///
    /// Panics if `raw` is not a valid storage path.
    pub fn with_leaf(self, raw: &str, content: impl Into<Vec<u8>>) -> Self {
        let path = StoragePath::parse(raw)
            .unwrap_or_else(|e| panic!("invalid storage path in fixture: {e}"));
        self.insert_leaf(&path, content);
        self
    }

    /// Add a failure rule.
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        self.inner().fail_on.push(fail_on);
        self
    }

    /// Clear all failure rules.
    pub fn clear_fail_on(&self) {
        self.inner().fail_on.clear();
    }

    /// Number of readers handed out and not yet dropped.
    pub fn open_readers(&self) -> usize {
        self.open_readers.load(Ordering::SeqCst)
    }

    /// Number of successful `open_read` calls so far.
    pub fn total_opens(&self) -> usize {
        self.inner().total_opens
    }

    fn entry(&self, path: &StoragePath) -> Result<Option<Entry>, StorageError> {
        let inner = self.inner();
        if inner.fail_on.contains(&FailOn::Stat(path.clone())) {
            return Err(injected(path, "stat"));
        }
        if path.is_root() {
            return Ok(Some(Entry::Container));
        }
        Ok(inner.entries.get(path).cloned())
    }
}

impl Storage for MemoryStorage {
    fn exists(&self, path: &StoragePath) -> Result<bool, StorageError> {
        Ok(self.entry(path)?.is_some())
    }

    fn is_container(&self, path: &StoragePath) -> Result<bool, StorageError> {
        Ok(matches!(self.entry(path)?, Some(Entry::Container)))
    }

    fn is_leaf(&self, path: &StoragePath) -> Result<bool, StorageError> {
        Ok(matches!(self.entry(path)?, Some(Entry::Leaf(_))))
    }

    fn list_entries(&self, path: &StoragePath) -> Result<Vec<StoragePath>, StorageError> {
        {
            let inner = self.inner();
            if inner.fail_on.contains(&FailOn::List(path.clone())) {
                return Err(injected(path, "list"));
            }
        }
        match self.entry(path)? {
            None => return Err(StorageError::NotFound(path.to_string())),
            Some(Entry::Leaf(_)) => return Err(StorageError::NotAContainer(path.to_string())),
            Some(Entry::Container) => {}
        }

        let depth = path.segments().len() + 1;
        let inner = self.inner();
        Ok(inner
            .entries
            .keys()
            .filter(|p| p.segments().len() == depth && path.is_ancestor_of(p))
            .cloned()
            .collect())
    }

    fn open_read(&self, path: &StoragePath) -> Result<LeafReader<'_>, StorageError> {
        let mut inner = self.inner();
        if inner.fail_on.contains(&FailOn::Open(path.clone())) {
            return Err(injected(path, "open"));
        }
        let fail_read = inner.fail_on.contains(&FailOn::Read(path.clone()));
        if path.is_root() {
            return Err(StorageError::NotALeaf(path.to_string()));
        }
        let content = match inner.entries.get(path) {
            None => return Err(StorageError::NotFound(path.to_string())),
            Some(Entry::Container) => return Err(StorageError::NotALeaf(path.to_string())),
            Some(Entry::Leaf(bytes)) => bytes.clone(),
        };
        inner.total_opens += 1;

        self.open_readers.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(TrackedReader {
            content: Cursor::new(content),
            open_readers: Arc::clone(&self.open_readers),
            fail_read,
        }))
    }
}

/// Reader that decrements the live-reader count when dropped.
struct TrackedReader {
    content: Cursor<Vec<u8>>,
    open_readers: Arc<AtomicUsize>,
    fail_read: bool,
}

impl Read for TrackedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.fail_read {
            return Err(io::Error::new(io::ErrorKind::Other, "injected read failure"));
        }
        self.content.read(buf)
    }
}

impl Drop for TrackedReader {
    fn drop(&mut self) {
        self.open_readers.fetch_sub(1, Ordering::SeqCst);
    }
}
