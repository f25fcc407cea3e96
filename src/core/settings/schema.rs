//! core::settings::schema
//!
//! Settings file schema.
//!
//! # Validation
//!
//! Values are validated after parsing: the scheme must name a storage
//! backend whose data lives outside the process, the root must parse as a
//! storage path, and layout names must be distinct single segments.

use serde::{Deserialize, Serialize};

use super::SettingsError;
use crate::core::paths::{Layout, StoragePath};
use crate::core::version::PolicyKind;
use crate::storage::{external_schemes, valid_schemes, DEFAULT_SCHEME};

/// Tool settings.
///
/// # Example
///
/// ```toml
/// scheme = "file"
/// root = "/srv/config-store"
/// version_policy = "numeric"
///
/// [layout]
/// payload_file = "main.toml"
/// include_file = "includes"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    /// Storage scheme (e.g., "file")
    pub scheme: Option<String>,

    /// Store root holding one directory per version
    pub root: Option<String>,

    /// Version ordering
    pub version_policy: Option<PolicyKind>,

    /// Per-node entry names
    pub layout: Option<Layout>,
}

impl SettingsFile {
    /// Validate the settings values.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some(scheme) = &self.scheme {
            validate_scheme(scheme)?;
        }

        if let Some(root) = &self.root {
            validate_root(root)?;
        }

        if let Some(layout) = &self.layout {
            layout.validate().map_err(SettingsError::InvalidValue)?;
        }

        Ok(())
    }

    /// Storage scheme, defaulting to `file`.
    pub fn scheme(&self) -> &str {
        self.scheme.as_deref().unwrap_or(DEFAULT_SCHEME)
    }

    /// Version policy, defaulting to numeric.
    pub fn version_policy(&self) -> PolicyKind {
        self.version_policy.unwrap_or_default()
    }

    /// Entry names, defaulting to `main.toml` and `includes`.
    pub fn layout(&self) -> Layout {
        self.layout.clone().unwrap_or_default()
    }
}

pub(crate) fn validate_scheme(scheme: &str) -> Result<(), SettingsError> {
    if !valid_schemes().contains(&scheme) {
        return Err(SettingsError::InvalidValue(format!(
            "invalid scheme '{}', must be one of: {}",
            scheme,
            external_schemes().join(", ")
        )));
    }
    if !external_schemes().contains(&scheme) {
        return Err(SettingsError::InvalidValue(format!(
            "scheme '{}' holds no data outside the process and is only available when embedding",
            scheme
        )));
    }
    Ok(())
}

pub(crate) fn validate_root(root: &str) -> Result<StoragePath, SettingsError> {
    if root.trim().is_empty() {
        return Err(SettingsError::InvalidValue("root cannot be empty".into()));
    }
    StoragePath::parse(root).map_err(|e| SettingsError::InvalidValue(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = SettingsFile::default();
        assert_eq!(settings.scheme(), "file");
        assert_eq!(settings.version_policy(), PolicyKind::Numeric);
        assert_eq!(settings.layout(), Layout::default());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn invalid_scheme() {
        let settings = SettingsFile {
            scheme: Some("s3".into()),
            ..Default::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("s3"));
    }

    #[test]
    fn in_process_scheme_rejected() {
        let settings = SettingsFile {
            scheme: Some("memory".into()),
            ..Default::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("only available when embedding"));
    }

    #[test]
    fn invalid_root() {
        for root in ["", "  ", "/a/../b"] {
            let settings = SettingsFile {
                root: Some(root.into()),
                ..Default::default()
            };
            assert!(settings.validate().is_err(), "root {root:?} should be rejected");
        }
    }

    #[test]
    fn invalid_layout() {
        let settings = SettingsFile {
            layout: Some(Layout {
                payload_file: "same".into(),
                include_file: "same".into(),
            }),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn partial_layout_fills_defaults() {
        let settings: SettingsFile = toml::from_str("[layout]\npayload_file = \"main.conf\"\n").unwrap();
        let layout = settings.layout();
        assert_eq!(layout.payload_file, "main.conf");
        assert_eq!(layout.include_file, "includes");
    }

    #[test]
    fn roundtrip() {
        let settings = SettingsFile {
            scheme: Some("file".into()),
            root: Some("/srv/configs".into()),
            version_policy: Some(PolicyKind::Lexicographic),
            layout: Some(Layout::default()),
        };
        let text = toml::to_string_pretty(&settings).unwrap();
        let parsed: SettingsFile = toml::from_str(&text).unwrap();
        assert_eq!(settings, parsed);
    }
}
