//! cli
//!
//! Command-line interface layer for cfgstore.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install the log subscriber
//! - Resolve settings and open the store
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap, folds flag
//! overrides into the loaded [`Settings`](crate::core::settings::Settings)
//! and hands a [`Context`] to the command handlers. Handlers only read.

pub mod args;
pub mod commands;
mod context;

pub use args::{Cli, Shell};
pub use context::Context;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.debug);

    let ctx = Context::from_cli(&cli)?;
    commands::dispatch(cli.command, &ctx)
}

/// Install the stderr log subscriber.
///
/// `--debug` forces the `debug` level; otherwise `RUST_LOG` applies,
/// defaulting to `warn`.
fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // a subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
