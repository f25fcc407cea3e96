//! core::settings
//!
//! Tool settings schema and loading.
//!
//! # Precedence
//!
//! Values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Settings file
//! 3. CLI flags (not handled here)
//!
//! # Locations
//!
//! Searched in order, first existing file wins:
//! 1. `$CFGSTORE_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/cfgstore/config.toml`
//! 3. `~/.cfgstore/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use cfgstore::core::settings::Settings;
//!
//! let settings = Settings::load().unwrap();
//! println!("scheme: {}", settings.scheme());
//! if let Some(root) = settings.root() {
//!     println!("root: {}", root);
//! }
//! ```

pub mod schema;

pub use schema::SettingsFile;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::paths::{Layout, StoragePath};
use crate::core::version::PolicyKind;

/// Environment variable naming an explicit settings file.
pub const SETTINGS_ENV: &str = "CFGSTORE_CONFIG";

/// Errors from settings operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse settings file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid settings value: {0}")]
    InvalidValue(String),
}

/// Candidate settings file locations, in search order.
#[derive(Debug, Clone, Default)]
pub struct SearchPaths {
    /// Explicit file from the environment
    pub explicit: Option<PathBuf>,
    /// `$XDG_CONFIG_HOME/cfgstore/config.toml`
    pub xdg: Option<PathBuf>,
    /// `~/.cfgstore/config.toml`
    pub home: Option<PathBuf>,
}

impl SearchPaths {
    /// Locations derived from the process environment.
    pub fn from_env() -> Self {
        Self {
            explicit: std::env::var_os(SETTINGS_ENV).map(PathBuf::from),
            xdg: std::env::var_os("XDG_CONFIG_HOME")
                .map(|xdg| PathBuf::from(xdg).join("cfgstore/config.toml")),
            home: dirs::home_dir().map(|home| home.join(".cfgstore/config.toml")),
        }
    }

    fn candidates(&self) -> impl Iterator<Item = &PathBuf> {
        [&self.explicit, &self.xdg, &self.home]
            .into_iter()
            .flatten()
    }
}

/// Loaded settings with defaults applied through accessors.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Parsed file contents
    pub file: SettingsFile,
    /// Path the settings were loaded from (if any)
    loaded_from: Option<PathBuf>,
}

impl Settings {
    /// Load settings from the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a settings file exists but cannot be read,
    /// parsed or validated. No file at all is not an error.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(&SearchPaths::from_env())
    }

    /// Load settings from the first existing candidate in `paths`.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load).
    pub fn load_from(paths: &SearchPaths) -> Result<Self, SettingsError> {
        for path in paths.candidates() {
            if path.exists() {
                let file = Self::read_file(path)?;
                file.validate()?;
                tracing::debug!(path = %path.display(), "loaded settings");
                return Ok(Self {
                    file,
                    loaded_from: Some(path.clone()),
                });
            }
        }

        tracing::debug!("no settings file found, using defaults");
        Ok(Self::default())
    }

    /// Read and parse a settings file.
    fn read_file(path: &Path) -> Result<SettingsFile, SettingsError> {
        let contents = fs::read_to_string(path).map_err(|e| SettingsError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| SettingsError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Override the scheme.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` for an unknown scheme.
    pub fn set_scheme(&mut self, scheme: impl Into<String>) -> Result<(), SettingsError> {
        let scheme = scheme.into();
        schema::validate_scheme(&scheme)?;
        self.file.scheme = Some(scheme);
        Ok(())
    }

    /// Override the store root.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` if the root is not a valid storage path.
    pub fn set_root(&mut self, root: impl Into<String>) -> Result<(), SettingsError> {
        let root = root.into();
        schema::validate_root(&root)?;
        self.file.root = Some(root);
        Ok(())
    }

    /// Override the version policy.
    pub fn set_version_policy(&mut self, policy: PolicyKind) {
        self.file.version_policy = Some(policy);
    }

    /// Storage scheme.
    pub fn scheme(&self) -> &str {
        self.file.scheme()
    }

    /// Configured store root, as written.
    pub fn root(&self) -> Option<&str> {
        self.file.root.as_deref()
    }

    /// Configured store root, parsed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` if no root is configured.
    pub fn store_root(&self) -> Result<StoragePath, SettingsError> {
        let root = self.root().ok_or_else(|| {
            SettingsError::InvalidValue(
                "no store root configured (use --root or set 'root' in the settings file)".into(),
            )
        })?;
        schema::validate_root(root)
    }

    /// Version ordering.
    pub fn version_policy(&self) -> PolicyKind {
        self.file.version_policy()
    }

    /// Per-node entry names.
    pub fn layout(&self) -> Layout {
        self.file.layout()
    }

    /// Path the settings were loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.loaded_from.as_deref()
    }
}
