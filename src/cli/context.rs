//! cli::context
//!
//! Per-invocation settings and store construction.

use anyhow::{Context as _, Result};

use super::args::Cli;
use crate::core::settings::Settings;
use crate::storage::create_storage;
use crate::store::{StoreOptions, VersionedStore};

/// Execution context shared by command handlers.
#[derive(Debug, Clone)]
pub struct Context {
    /// Settings with CLI overrides applied.
    pub settings: Settings,
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (minimal output).
    pub quiet: bool,
}

impl Context {
    /// Load settings and apply the global flags on top.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file is invalid or a flag value
    /// is rejected.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut settings = Settings::load().context("Failed to load settings")?;
        if let Some(path) = settings.loaded_from() {
            tracing::debug!(path = %path.display(), "using settings file");
        }

        if let Some(scheme) = &cli.scheme {
            settings.set_scheme(scheme.as_str()).context("Invalid --scheme")?;
        }
        if let Some(root) = &cli.root {
            settings.set_root(root.as_str()).context("Invalid --root")?;
        }
        if let Some(policy) = cli.policy {
            settings.set_version_policy(policy);
        }

        Ok(Self {
            settings,
            debug: cli.debug,
            quiet: cli.quiet,
        })
    }

    /// Open the store described by the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if no root is configured, the scheme is unknown,
    /// or no current version can be resolved.
    pub fn open_store(&self) -> Result<VersionedStore> {
        let root = self.settings.store_root()?;
        let scheme = self.settings.scheme();
        let storage = create_storage(scheme)?;

        let options = StoreOptions {
            policy: self.settings.version_policy().into_policy(),
            layout: self.settings.layout(),
            ..StoreOptions::default()
        };

        VersionedStore::open_with(scheme, root.clone(), storage, options)
            .with_context(|| format!("Failed to open store at '{}'", root))
    }
}
