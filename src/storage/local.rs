//! storage::local
//!
//! Local filesystem backend.
//!
//! Storage paths are mapped below a base directory (default `/`), so
//! `/store/1` with base `/srv` reads `/srv/store/1`. Directories are
//! containers, regular files are leaves. Symlinks are followed.
//!
//! # Example
//!
//! ```no_run
//! use cfgstore::core::paths::StoragePath;
//! use cfgstore::storage::{LocalStorage, Storage};
//!
//! let storage = LocalStorage::new();
//! let root = StoragePath::parse("/srv/configs").unwrap();
//! for entry in storage.list_entries(&root)? {
//!     println!("{}", entry);
//! }
//! # Ok::<(), cfgstore::storage::StorageError>(())
//! ```

use std::fs::{self, File, Metadata};
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use super::traits::{LeafReader, Storage, StorageError};
use crate::core::paths::StoragePath;

/// Filesystem-backed storage.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    /// Directory that storage path `/` maps to.
    base: PathBuf,
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalStorage {
    /// Storage rooted at the filesystem root.
    pub fn new() -> Self {
        Self {
            base: PathBuf::from("/"),
        }
    }

    /// Storage rooted at a custom directory.
    ///
    /// This is primarily useful for testing.
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Get the base directory.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Filesystem path for a storage path.
    pub fn resolve(&self, path: &StoragePath) -> PathBuf {
        let mut resolved = self.base.clone();
        for segment in path.segments() {
            resolved.push(segment);
        }
        resolved
    }

    /// Metadata, or `None` if nothing exists at `path`.
    fn metadata(&self, path: &StoragePath) -> Result<Option<Metadata>, StorageError> {
        match fs::metadata(self.resolve(path)) {
            Ok(meta) => Ok(Some(meta)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(path, e)),
        }
    }
}

impl Storage for LocalStorage {
    fn exists(&self, path: &StoragePath) -> Result<bool, StorageError> {
        Ok(self.metadata(path)?.is_some())
    }

    fn is_container(&self, path: &StoragePath) -> Result<bool, StorageError> {
        Ok(self.metadata(path)?.map(|m| m.is_dir()).unwrap_or(false))
    }

    fn is_leaf(&self, path: &StoragePath) -> Result<bool, StorageError> {
        Ok(self.metadata(path)?.map(|m| m.is_file()).unwrap_or(false))
    }

    fn list_entries(&self, path: &StoragePath) -> Result<Vec<StoragePath>, StorageError> {
        match self.metadata(path)? {
            None => return Err(StorageError::NotFound(path.to_string())),
            Some(meta) if !meta.is_dir() => {
                return Err(StorageError::NotAContainer(path.to_string()))
            }
            Some(_) => {}
        }

        let reader = fs::read_dir(self.resolve(path)).map_err(|e| StorageError::io(path, e))?;

        let mut names = Vec::new();
        for entry in reader {
            let entry = entry.map_err(|e| StorageError::io(path, e))?;
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => {
                    tracing::warn!(parent = %path, name = ?raw, "skipping non UTF-8 entry name");
                }
            }
        }
        names.sort();

        let mut entries = Vec::with_capacity(names.len());
        for name in names {
            match path.child(&name) {
                Ok(child) => entries.push(child),
                Err(e) => tracing::warn!(parent = %path, error = %e, "skipping entry"),
            }
        }
        Ok(entries)
    }

    fn open_read(&self, path: &StoragePath) -> Result<LeafReader<'_>, StorageError> {
        match self.metadata(path)? {
            None => return Err(StorageError::NotFound(path.to_string())),
            Some(meta) if !meta.is_file() => return Err(StorageError::NotALeaf(path.to_string())),
            Some(_) => {}
        }
        let file = File::open(self.resolve(path)).map_err(|e| StorageError::io(path, e))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, LocalStorage) {
        let dir = TempDir::new().expect("create temp dir");
        fs::create_dir_all(dir.path().join("store/1/b")).unwrap();
        fs::create_dir_all(dir.path().join("store/1/a")).unwrap();
        fs::write(dir.path().join("store/1/main.toml"), "k = 1\n").unwrap();
        let storage = LocalStorage::with_base(dir.path());
        (dir, storage)
    }

    fn p(raw: &str) -> StoragePath {
        StoragePath::parse(raw).unwrap()
    }

    #[test]
    fn resolve_maps_under_base() {
        let storage = LocalStorage::with_base("/srv");
        assert_eq!(storage.resolve(&p("/a/b")), PathBuf::from("/srv/a/b"));
        assert_eq!(storage.resolve(&StoragePath::root()), PathBuf::from("/srv"));
    }

    #[test]
    fn kind_checks() {
        let (_dir, storage) = fixture();
        assert!(storage.exists(&p("/store/1")).unwrap());
        assert!(storage.is_container(&p("/store/1")).unwrap());
        assert!(!storage.is_leaf(&p("/store/1")).unwrap());
        assert!(storage.is_leaf(&p("/store/1/main.toml")).unwrap());
        assert!(!storage.is_container(&p("/store/1/main.toml")).unwrap());
    }

    #[test]
    fn missing_is_false_not_error() {
        let (_dir, storage) = fixture();
        assert!(!storage.exists(&p("/nope")).unwrap());
        assert!(!storage.is_container(&p("/nope")).unwrap());
        assert!(!storage.is_leaf(&p("/nope")).unwrap());
    }

    #[test]
    fn list_is_sorted() {
        let (_dir, storage) = fixture();
        let entries = storage.list_entries(&p("/store/1")).unwrap();
        let names: Vec<_> = entries.iter().filter_map(|e| e.file_name()).collect();
        assert_eq!(names, vec!["a", "b", "main.toml"]);
    }

    #[test]
    fn list_missing_and_leaf() {
        let (_dir, storage) = fixture();
        assert!(matches!(
            storage.list_entries(&p("/nope")),
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            storage.list_entries(&p("/store/1/main.toml")),
            Err(StorageError::NotAContainer(_))
        ));
    }

    #[test]
    fn open_reads_bytes() {
        let (_dir, storage) = fixture();
        let mut content = String::new();
        storage
            .open_read(&p("/store/1/main.toml"))
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "k = 1\n");
    }

    #[test]
    fn open_container_fails() {
        let (_dir, storage) = fixture();
        assert!(matches!(
            storage.open_read(&p("/store/1")),
            Err(StorageError::NotALeaf(_))
        ));
        assert!(matches!(
            storage.open_read(&p("/store/1/none")),
            Err(StorageError::NotFound(_))
        ));
    }
}
