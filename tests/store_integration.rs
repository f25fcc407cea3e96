//! Integration tests for the versioned store over the local filesystem.
//!
//! Each test builds a store tree in a temp dir and queries it through
//! `LocalStorage`, the way the `file` scheme is used in practice.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use tempfile::TempDir;

use cfgstore::core::paths::{Layout, StoragePath};
use cfgstore::core::types::Location;
use cfgstore::core::version::LexicographicPolicy;
use cfgstore::storage::LocalStorage;
use cfgstore::store::{
    ConfigStore, ImportDiagnostic, StoreError, StoreOptions, TargetProblem, VersionedStore,
};

// =============================================================================
// Test Fixtures
// =============================================================================

/// A store root in a temp dir.
struct TestStore {
    dir: TempDir,
}

impl TestStore {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn mkdir(&self, rel: &str) -> &Self {
        fs::create_dir_all(self.root().join(rel)).unwrap();
        self
    }

    fn write(&self, rel: &str, contents: &str) -> &Self {
        let path = self.root().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
        self
    }

    fn storage_root(&self) -> StoragePath {
        StoragePath::parse(self.root().to_str().unwrap()).unwrap()
    }

    fn open(&self) -> Result<VersionedStore, StoreError> {
        VersionedStore::open("file", self.storage_root(), Arc::new(LocalStorage::new()))
    }

    fn open_with(&self, options: StoreOptions) -> Result<VersionedStore, StoreError> {
        VersionedStore::open_with(
            "file",
            self.storage_root(),
            Arc::new(LocalStorage::new()),
            options,
        )
    }
}

fn loc(raw: &str) -> Location {
    Location::new(raw).unwrap()
}

/// Two versions; version 10 holds a small team hierarchy.
fn team_fixture() -> TestStore {
    let store = TestStore::new();
    store
        .mkdir("1/old")
        .mkdir("2")
        .mkdir("10/teamA/db")
        .mkdir("10/teamB")
        .write("10/main.toml", "key = \"v\"\n")
        .write("10/teamA/main.toml", "name = \"a\"\nurl = \"http://${name}.local\"\n")
        .write("10/teamA/includes", "teamB\nmissing\n\nteamA/db\n")
        .write("10/teamB/includes", "teamA/main.toml\n");
    store
}

// =============================================================================
// Version selection
// =============================================================================

#[test]
fn selects_numeric_maximum() {
    let store = TestStore::new();
    store.mkdir("1").mkdir("2").mkdir("10");
    let opened = store.open().unwrap();
    assert_eq!(opened.current_version().as_str(), "10");
}

#[test]
fn injected_policy_changes_selection() {
    let store = TestStore::new();
    store.mkdir("1").mkdir("2").mkdir("10");
    let opened = store
        .open_with(StoreOptions {
            policy: Arc::new(LexicographicPolicy),
            ..StoreOptions::default()
        })
        .unwrap();
    assert_eq!(opened.current_version().as_str(), "2");
}

#[test]
fn closure_policy() {
    let store = TestStore::new();
    store.mkdir("alpha").mkdir("beta");
    let oldest = |candidates: &[String]| candidates.iter().min().cloned();
    let opened = store
        .open_with(StoreOptions {
            policy: Arc::new(oldest),
            ..StoreOptions::default()
        })
        .unwrap();
    assert_eq!(opened.current_version().as_str(), "alpha");
}

#[test]
fn files_only_has_no_valid_version() {
    let store = TestStore::new();
    store.write("1", "not a directory").write("2", "neither");
    assert!(matches!(
        store.open().unwrap_err(),
        StoreError::NoValidVersion { .. }
    ));
}

#[test]
fn root_that_is_a_file() {
    let store = TestStore::new();
    store.write("file", "x");
    let root = StoragePath::parse(store.root().join("file").to_str().unwrap()).unwrap();
    let err = VersionedStore::open("file", root, Arc::new(LocalStorage::new())).unwrap_err();
    assert!(matches!(err, StoreError::RootNotContainer { .. }));
}

#[test]
fn missing_root_is_unreadable() {
    let store = TestStore::new();
    let root = StoragePath::parse(store.root().join("nope").to_str().unwrap()).unwrap();
    let err = VersionedStore::open("file", root, Arc::new(LocalStorage::new())).unwrap_err();
    assert!(matches!(err, StoreError::RootUnreadable { .. }));
}

#[test]
fn root_with_scheme_prefix() {
    let store = team_fixture();
    let raw = format!("file://{}", store.root().display());
    let root = StoragePath::parse(&raw).unwrap();
    let opened = VersionedStore::open("file", root, Arc::new(LocalStorage::new())).unwrap();
    assert_eq!(opened.current_version().as_str(), "10");
}

// =============================================================================
// Navigation
// =============================================================================

#[test]
fn parent_and_children() {
    let store = team_fixture();
    let opened = store.open().unwrap();

    assert_eq!(opened.parent(Some(&loc("teamA/db"))).unwrap(), Some(loc("teamA")));
    assert_eq!(opened.parent(Some(&loc("teamA"))).unwrap(), Some(Location::root()));
    assert_eq!(opened.parent(Some(&Location::root())).unwrap(), None);

    assert_eq!(
        opened.children(Some(&Location::root())).unwrap(),
        vec![loc("teamA"), loc("teamB")]
    );
    assert_eq!(opened.children(Some(&loc("teamA"))).unwrap(), vec![loc("teamA/db")]);
}

#[test]
fn other_versions_are_invisible() {
    let store = team_fixture();
    let opened = store.open().unwrap();
    assert!(opened.children(Some(&loc("old"))).unwrap().is_empty());
    assert!(opened.own_config(Some(&loc("old"))).unwrap().is_empty());
}

// =============================================================================
// Imports
// =============================================================================

#[test]
fn imports_keep_only_existing_nodes() {
    let store = team_fixture();
    let opened = store.open().unwrap();
    assert_eq!(
        opened.imports(Some(&loc("teamA"))),
        vec![loc("teamB"), loc("teamA/db")]
    );
}

#[test]
fn imports_explained() {
    let store = team_fixture();
    let opened = store.open().unwrap();

    let resolution = opened.resolve_imports(Some(&loc("teamA")));
    assert_eq!(
        resolution.diagnostics,
        vec![ImportDiagnostic::InvalidTarget {
            line: 2,
            target: loc("missing"),
            problem: TargetProblem::Missing,
        }]
    );

    let resolution = opened.resolve_imports(Some(&loc("teamB")));
    assert!(resolution.imports.is_empty());
    assert_eq!(
        resolution.diagnostics,
        vec![ImportDiagnostic::InvalidTarget {
            line: 1,
            target: loc("teamA/main.toml"),
            problem: TargetProblem::NotAContainer,
        }]
    );
}

#[test]
fn no_include_file_means_no_imports() {
    let store = team_fixture();
    let opened = store.open().unwrap();
    assert!(opened.imports(Some(&loc("teamA/db"))).is_empty());
    assert!(opened.imports(None).is_empty());
}

// =============================================================================
// Own config
// =============================================================================

#[test]
fn root_payload() {
    let store = team_fixture();
    let opened = store.open().unwrap();
    let config = opened.own_config(Some(&Location::root())).unwrap();
    assert_eq!(config.get_str("key"), Some("v"));
}

#[test]
fn payload_substitutions() {
    let store = team_fixture();
    let opened = store.open().unwrap();
    let config = opened.own_config(Some(&loc("teamA"))).unwrap();
    assert_eq!(config.get_str("url"), Some("http://a.local"));
}

#[test]
fn node_without_payload_is_empty() {
    let store = team_fixture();
    let opened = store.open().unwrap();
    assert!(opened.own_config(Some(&loc("teamB"))).unwrap().is_empty());
    assert!(opened.own_config(None).unwrap().is_empty());
}

#[test]
fn custom_layout() {
    let store = TestStore::new();
    store
        .mkdir("1/a")
        .mkdir("1/b")
        .write("1/a/node.toml", "x = 1\n")
        .write("1/a/deps", "b\n");
    let opened = store
        .open_with(StoreOptions {
            layout: Layout {
                payload_file: "node.toml".into(),
                include_file: "deps".into(),
            },
            ..StoreOptions::default()
        })
        .unwrap();

    let config = opened.own_config(Some(&loc("a"))).unwrap();
    assert_eq!(config.get("x").and_then(|v| v.as_integer()), Some(1));
    assert_eq!(opened.imports(Some(&loc("a"))), vec![loc("b")]);
}

#[test]
fn invalid_payload_is_a_parse_error() {
    let store = TestStore::new();
    store.mkdir("1").write("1/main.toml", "key = \n");
    let opened = store.open().unwrap();
    assert!(matches!(
        opened.own_config(Some(&Location::root())),
        Err(StoreError::Parse { .. })
    ));
}

// =============================================================================
// Stability
// =============================================================================

#[test]
fn queries_are_idempotent() {
    let store = team_fixture();
    let opened = store.open().unwrap();
    let target = loc("teamA");

    assert_eq!(
        opened.children(Some(&target)).unwrap(),
        opened.children(Some(&target)).unwrap()
    );
    assert_eq!(opened.imports(Some(&target)), opened.imports(Some(&target)));
    assert_eq!(
        opened.own_config(Some(&target)).unwrap(),
        opened.own_config(Some(&target)).unwrap()
    );
}

#[test]
fn version_is_fixed_after_open() {
    let store = team_fixture();
    let opened = store.open().unwrap();
    store.mkdir("11/teamC");

    assert_eq!(opened.current_version().as_str(), "10");
    assert_eq!(
        opened.children(Some(&Location::root())).unwrap(),
        vec![loc("teamA"), loc("teamB")]
    );
    assert_eq!(store.open().unwrap().current_version().as_str(), "11");
}

#[test]
fn concurrent_queries() {
    let store = team_fixture();
    let opened: Arc<dyn ConfigStore> = Arc::new(store.open().unwrap());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let opened = Arc::clone(&opened);
            thread::spawn(move || {
                (
                    opened.children(Some(&Location::root())).unwrap(),
                    opened.imports(Some(&loc("teamA"))),
                )
            })
        })
        .collect();

    for handle in handles {
        let (children, imports) = handle.join().unwrap();
        assert_eq!(children, vec![loc("teamA"), loc("teamB")]);
        assert_eq!(imports, vec![loc("teamB"), loc("teamA/db")]);
    }
}
