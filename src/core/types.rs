//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`Location`] - Version-relative identifier of a configuration node
//! - [`Version`] - Label of one immutable snapshot of the tree
//!
//! # Validation
//!
//! These types enforce validity at construction time. A `Location` that
//! escapes its version root (`..`, absolute paths) cannot be represented.
//!
//! # Examples
//!
//! ```
//! use cfgstore::core::types::{Location, Version};
//!
//! let loc = Location::new("teams/alpha").unwrap();
//! assert_eq!(loc.parent(), Some(Location::new("teams").unwrap()));
//!
//! let version = Version::new("10").unwrap();
//! assert_eq!(version.as_str(), "10");
//!
//! // Invalid constructions fail at creation time
//! assert!(Location::new("/etc").is_err());
//! assert!(Location::new("a/../b").is_err());
//! assert!(Version::new("1/2").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid location '{value}': {reason}")]
    InvalidLocation { value: String, reason: String },

    #[error("invalid version label '{value}': {reason}")]
    InvalidVersion { value: String, reason: String },

    #[error("invalid storage path '{value}': {reason}")]
    InvalidStoragePath { value: String, reason: String },
}

/// Check a single path segment.
///
/// Shared by [`Location`], [`Version`] and [`crate::core::paths::StoragePath`]
/// so that every storage segment is also a valid location segment.
pub(crate) fn validate_segment(segment: &str) -> Result<(), String> {
    if segment.is_empty() {
        return Err("empty path segment".into());
    }
    if segment == "." || segment == ".." {
        return Err(format!("'{segment}' segments are not allowed"));
    }
    if segment.contains('/') {
        return Err("segment cannot contain '/'".into());
    }
    if segment.chars().any(|c| c.is_control()) {
        return Err("segment cannot contain control characters".into());
    }
    Ok(())
}

/// A node location relative to the version root.
///
/// Locations are slash-separated segment lists. The empty string is the
/// root node of the version.
///
/// Rules:
/// - No leading or trailing `/`
/// - No empty segments (`a//b`)
/// - No `.` or `..` segments
/// - No control characters
///
/// # Example
///
/// ```
/// use cfgstore::core::types::Location;
///
/// let root = Location::root();
/// assert!(root.is_root());
/// assert_eq!(root.as_str(), "");
///
/// let loc = Location::new("a/b/c").unwrap();
/// assert_eq!(loc.segments().collect::<Vec<_>>(), vec!["a", "b", "c"]);
/// assert_eq!(loc.name(), Some("c"));
///
/// assert!(Location::new("a/").is_err());
/// assert!(Location::new("a//b").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Location(String);

impl Location {
    /// Create a new validated location.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidLocation` if the value violates the rules above.
    pub fn new(value: impl Into<String>) -> Result<Self, TypeError> {
        let value = value.into();
        Self::validate(&value)?;
        Ok(Self(value))
    }

    /// The root location (`""`).
    pub fn root() -> Self {
        Self(String::new())
    }

    fn validate(value: &str) -> Result<(), TypeError> {
        if value.is_empty() {
            return Ok(());
        }

        let invalid = |reason: String| TypeError::InvalidLocation {
            value: value.to_string(),
            reason,
        };

        if value.starts_with('/') {
            return Err(invalid("location must be relative".into()));
        }
        if value.ends_with('/') {
            return Err(invalid("location cannot end with '/'".into()));
        }
        for segment in value.split('/') {
            validate_segment(segment).map_err(invalid)?;
        }
        Ok(())
    }

    /// Build a location from segments that are already known to be valid.
    pub(crate) fn from_segments<S: AsRef<str>>(segments: &[S]) -> Self {
        let joined = segments
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<_>>()
            .join("/");
        Self(joined)
    }

    /// Whether this is the root location.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the segments. The root has none.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Last segment, `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.segments().last()
    }

    /// Structural parent; `None` for the root.
    pub fn parent(&self) -> Option<Location> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind('/') {
            Some(idx) => Some(Self(self.0[..idx].to_string())),
            None => Some(Self::root()),
        }
    }

    /// Append one child segment.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidLocation` if `name` is not a single valid segment.
    pub fn child(&self, name: &str) -> Result<Location, TypeError> {
        validate_segment(name).map_err(|reason| TypeError::InvalidLocation {
            value: name.to_string(),
            reason,
        })?;
        if self.is_root() {
            Ok(Self(name.to_string()))
        } else {
            Ok(Self(format!("{}/{}", self.0, name)))
        }
    }

    /// Get the location as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Location {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Location> for String {
    fn from(loc: Location) -> Self {
        loc.0
    }
}

impl std::str::FromStr for Location {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for Location {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A version label.
///
/// A version names one container directly under the store root, so it
/// must be a single valid path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version(String);

impl Version {
    /// Create a new validated version label.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidVersion` if the label is not a single segment.
    pub fn new(label: impl Into<String>) -> Result<Self, TypeError> {
        let label = label.into();
        validate_segment(&label).map_err(|reason| TypeError::InvalidVersion {
            value: label.clone(),
            reason,
        })?;
        Ok(Self(label))
    }

    /// Get the label as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Version {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Version> for String {
    fn from(v: Version) -> Self {
        v.0
    }
}

impl AsRef<str> for Version {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
