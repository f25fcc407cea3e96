//! core::paths
//!
//! Centralized path routing between node locations and storage paths.
//!
//! # Architecture
//!
//! Every storage path the store touches is computed here. A [`NodePaths`]
//! is bound to one version root; [`NodePaths::to_storage_path`] maps a
//! [`Location`] under that root and [`NodePaths::to_location`] maps a
//! storage path back, refusing anything outside the root.
//!
//! **Hard rule:** No code may join node locations onto storage paths by
//! hand. All routing goes through `NodePaths`.
//!
//! # Storage Layout
//!
//! ```text
//! <store_root>/<version>/<location...>/
//!     main.toml   - own-config payload (optional)
//!     includes    - import declarations (optional)
//! ```
//!
//! # Example
//!
//! ```
//! use cfgstore::core::paths::{Layout, NodePaths, StoragePath};
//! use cfgstore::core::types::{Location, Version};
//!
//! let root = StoragePath::parse("/srv/configs").unwrap();
//! let paths = NodePaths::new(&root, &Version::new("10").unwrap(), Layout::default());
//!
//! let loc = Location::new("teams/alpha").unwrap();
//! let path = paths.to_storage_path(&loc);
//! assert_eq!(path.to_string(), "/srv/configs/10/teams/alpha");
//! assert_eq!(paths.to_location(&path).unwrap(), loc);
//! assert_eq!(
//!     paths.payload_path(&loc).to_string(),
//!     "/srv/configs/10/teams/alpha/main.toml"
//! );
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::{validate_segment, Location, TypeError, Version};

/// Default name of a node's own-config payload.
pub const DEFAULT_PAYLOAD_FILE: &str = "main.toml";

/// Default name of a node's import declaration file.
pub const DEFAULT_INCLUDE_FILE: &str = "includes";

/// Errors from path routing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("path '{path}' is outside version root '{root}'")]
    OutsideVersionRoot { path: String, root: String },
}

/// A parsed, absolute, hierarchical storage path.
///
/// Paths are kept as segment lists so containment is a structural
/// relation rather than a string prefix test.
///
/// # Example
///
/// ```
/// use cfgstore::core::paths::StoragePath;
///
/// let a = StoragePath::parse("file:///data/store").unwrap();
/// let b = StoragePath::parse("/data/store/1/x").unwrap();
/// assert_eq!(a.to_string(), "/data/store");
/// assert!(a.is_ancestor_of(&b));
/// assert!(!b.is_ancestor_of(&a));
/// assert!(!a.is_ancestor_of(&StoragePath::parse("/data/storefront").unwrap()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoragePath {
    segments: Vec<String>,
}

impl StoragePath {
    /// The storage root (`/`).
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a storage path.
    ///
    /// An optional `scheme://authority` prefix is stripped. Empty and `.`
    /// segments are dropped, so `/a//b/./c` and `a/b/c` are the same path.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidStoragePath` on `..` segments or control
    /// characters.
    pub fn parse(raw: &str) -> Result<Self, TypeError> {
        let path = match raw.find("://") {
            Some(idx) => {
                let rest = &raw[idx + 3..];
                match rest.find('/') {
                    Some(slash) => &rest[slash..],
                    None => "",
                }
            }
            None => raw,
        };

        let mut segments = Vec::new();
        for segment in path.split('/') {
            if segment.is_empty() || segment == "." {
                continue;
            }
            validate_segment(segment).map_err(|reason| TypeError::InvalidStoragePath {
                value: raw.to_string(),
                reason,
            })?;
            segments.push(segment.to_string());
        }
        Ok(Self { segments })
    }

    /// Path segments from the root down.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Whether this is the storage root.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Last segment, `None` for the root.
    pub fn file_name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Parent path, `None` for the root.
    pub fn parent(&self) -> Option<StoragePath> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Append one entry name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidStoragePath` if `name` is not a single valid segment.
    pub fn child(&self, name: &str) -> Result<StoragePath, TypeError> {
        validate_segment(name).map_err(|reason| TypeError::InvalidStoragePath {
            value: name.to_string(),
            reason,
        })?;
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Ok(Self { segments })
    }

    /// Append every segment of a location. Total, since location segments
    /// are valid storage segments.
    pub fn join_location(&self, loc: &Location) -> StoragePath {
        let mut segments = self.segments.clone();
        segments.extend(loc.segments().map(str::to_string));
        Self { segments }
    }

    /// Strict ancestor relation.
    pub fn is_ancestor_of(&self, other: &StoragePath) -> bool {
        other.segments.len() > self.segments.len() && other.segments.starts_with(&self.segments)
    }

    /// Segments of `self` below `base`, if `base` is `self` or an ancestor.
    pub fn strip_prefix(&self, base: &StoragePath) -> Option<&[String]> {
        if self.segments.starts_with(&base.segments) {
            Some(&self.segments[base.segments.len()..])
        } else {
            None
        }
    }
}

impl std::fmt::Display for StoragePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}", self.segments.join("/"))
    }
}

impl std::str::FromStr for StoragePath {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Names of the per-node entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Layout {
    /// Own-config payload file name.
    pub payload_file: String,

    /// Import declaration file name.
    pub include_file: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            payload_file: DEFAULT_PAYLOAD_FILE.to_string(),
            include_file: DEFAULT_INCLUDE_FILE.to_string(),
        }
    }
}

impl Layout {
    /// Check both names are single valid segments and distinct.
    pub fn validate(&self) -> Result<(), String> {
        validate_segment(&self.payload_file)
            .map_err(|e| format!("invalid payload_file '{}': {}", self.payload_file, e))?;
        validate_segment(&self.include_file)
            .map_err(|e| format!("invalid include_file '{}': {}", self.include_file, e))?;
        if self.payload_file == self.include_file {
            return Err(format!(
                "payload_file and include_file must differ (both '{}')",
                self.payload_file
            ));
        }
        Ok(())
    }
}

/// Path routing for one resolved version.
///
/// # Invariants
///
/// - Every path produced by this struct is the version root or below it
/// - `to_location(to_storage_path(loc)) == loc` for every location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodePaths {
    version_root: StoragePath,
    layout: Layout,
}

impl NodePaths {
    /// Bind routing to `store_root/version`.
    pub fn new(store_root: &StoragePath, version: &Version, layout: Layout) -> Self {
        let mut segments = store_root.segments.clone();
        segments.push(version.as_str().to_string());
        Self {
            version_root: StoragePath { segments },
            layout,
        }
    }

    /// The fixed base of all location resolution.
    pub fn version_root(&self) -> &StoragePath {
        &self.version_root
    }

    /// Entry names in use.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Storage path of a node. The root location maps to the version root.
    pub fn to_storage_path(&self, loc: &Location) -> StoragePath {
        self.version_root.join_location(loc)
    }

    /// Location of a storage path under the version root.
    ///
    /// # Errors
    ///
    /// Returns `PathError::OutsideVersionRoot` if `path` is neither the
    /// version root nor one of its descendants.
    pub fn to_location(&self, path: &StoragePath) -> Result<Location, PathError> {
        match path.strip_prefix(&self.version_root) {
            Some(rest) => Ok(Location::from_segments(rest)),
            None => Err(PathError::OutsideVersionRoot {
                path: path.to_string(),
                root: self.version_root.to_string(),
            }),
        }
    }

    /// Storage path of a node's own-config payload.
    pub fn payload_path(&self, loc: &Location) -> StoragePath {
        let mut path = self.to_storage_path(loc);
        path.segments.push(self.layout.payload_file.clone());
        path
    }

    /// Storage path of a node's import declaration file.
    pub fn include_path(&self, loc: &Location) -> StoragePath {
        let mut path = self.to_storage_path(loc);
        path.segments.push(self.layout.include_file.clone());
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths() -> NodePaths {
        NodePaths::new(
            &StoragePath::parse("/store").unwrap(),
            &Version::new("2").unwrap(),
            Layout::default(),
        )
    }

    mod storage_path {
        use super::*;

        #[test]
        fn parse_normalizes() {
            let p = StoragePath::parse("/a//b/./c/").unwrap();
            assert_eq!(p.segments(), &["a", "b", "c"]);
            assert_eq!(p, StoragePath::parse("a/b/c").unwrap());
        }

        #[test]
        fn parse_strips_scheme_and_authority() {
            let p = StoragePath::parse("hdfs://namenode:8020/configs/x").unwrap();
            assert_eq!(p.to_string(), "/configs/x");
            let p = StoragePath::parse("file:///tmp").unwrap();
            assert_eq!(p.to_string(), "/tmp");
            let p = StoragePath::parse("mem://host").unwrap();
            assert!(p.is_root());
        }

        #[test]
        fn parse_rejects_parent_segments() {
            assert!(StoragePath::parse("/a/../b").is_err());
        }

        #[test]
        fn root_display() {
            assert_eq!(StoragePath::root().to_string(), "/");
            assert_eq!(StoragePath::parse("/").unwrap(), StoragePath::root());
        }

        #[test]
        fn parent_and_file_name() {
            let p = StoragePath::parse("/a/b").unwrap();
            assert_eq!(p.file_name(), Some("b"));
            assert_eq!(p.parent().unwrap().to_string(), "/a");
            assert_eq!(StoragePath::root().parent(), None);
            assert_eq!(StoragePath::root().file_name(), None);
        }

        #[test]
        fn child_validates() {
            let p = StoragePath::parse("/a").unwrap();
            assert_eq!(p.child("b").unwrap().to_string(), "/a/b");
            assert!(p.child("b/c").is_err());
            assert!(p.child("..").is_err());
            assert!(p.child("").is_err());
        }

        #[test]
        fn ancestor_is_structural() {
            let base = StoragePath::parse("/data/store").unwrap();
            assert!(base.is_ancestor_of(&StoragePath::parse("/data/store/x").unwrap()));
            assert!(!base.is_ancestor_of(&base));
            assert!(!base.is_ancestor_of(&StoragePath::parse("/data/storefront").unwrap()));
            assert!(StoragePath::root().is_ancestor_of(&base));
        }

        #[test]
        fn strip_prefix() {
            let base = StoragePath::parse("/a").unwrap();
            let p = StoragePath::parse("/a/b/c").unwrap();
            assert_eq!(p.strip_prefix(&base).unwrap(), &["b", "c"]);
            assert_eq!(base.strip_prefix(&base).unwrap().len(), 0);
            assert!(base.strip_prefix(&p).is_none());
        }
    }

    mod node_paths {
        use super::*;

        #[test]
        fn root_location_maps_to_version_root() {
            let paths = paths();
            assert_eq!(paths.to_storage_path(&Location::root()), *paths.version_root());
            assert_eq!(paths.version_root().to_string(), "/store/2");
        }

        #[test]
        fn location_roundtrip() {
            let paths = paths();
            for raw in ["a", "a/b", "x/y/z"] {
                let loc = Location::new(raw).unwrap();
                assert_eq!(paths.to_location(&paths.to_storage_path(&loc)).unwrap(), loc);
            }
        }

        #[test]
        fn version_root_maps_to_root_location() {
            let paths = paths();
            let loc = paths.to_location(paths.version_root()).unwrap();
            assert!(loc.is_root());
        }

        #[test]
        fn outside_root_rejected() {
            let paths = paths();
            for raw in ["/store", "/store/1/a", "/other", "/store/20"] {
                let err = paths
                    .to_location(&StoragePath::parse(raw).unwrap())
                    .unwrap_err();
                assert!(matches!(err, PathError::OutsideVersionRoot { .. }));
            }
        }

        #[test]
        fn entry_paths() {
            let paths = paths();
            let loc = Location::new("teamA").unwrap();
            assert_eq!(paths.payload_path(&loc).to_string(), "/store/2/teamA/main.toml");
            assert_eq!(paths.include_path(&loc).to_string(), "/store/2/teamA/includes");
            assert_eq!(
                paths.include_path(&Location::root()).to_string(),
                "/store/2/includes"
            );
        }
    }

    mod layout {
        use super::*;

        #[test]
        fn default_is_valid() {
            assert!(Layout::default().validate().is_ok());
        }

        #[test]
        fn rejects_nested_names() {
            let layout = Layout {
                payload_file: "conf/main.toml".into(),
                ..Layout::default()
            };
            assert!(layout.validate().is_err());
        }

        #[test]
        fn rejects_identical_names() {
            let layout = Layout {
                payload_file: "x".into(),
                include_file: "x".into(),
            };
            assert!(layout.validate().unwrap_err().contains("must differ"));
        }
    }
}
