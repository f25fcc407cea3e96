//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Parses its location argument
//! 2. Opens the store through the [`Context`]
//! 3. Formats and displays output
//!
//! Handlers never write to the store.

mod completion;
mod imports;
mod navigation;
mod show;
mod tree;
mod version;

// Re-export command functions for testing and direct invocation
pub use completion::completion;
pub use imports::imports;
pub use navigation::{children, parent};
pub use show::show;
pub use tree::tree;
pub use version::version;

use anyhow::{Context as _, Result};

use super::args::Command;
use super::Context;
use crate::core::types::Location;

/// Dispatch a parsed command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Version => version(ctx),
        Command::Parent { location } => parent(ctx, &location),
        Command::Children { location } => children(ctx, location.as_deref()),
        Command::Imports { location, explain } => imports(ctx, location.as_deref(), explain),
        Command::Show { location, json } => show(ctx, location.as_deref(), json),
        Command::Tree { location } => tree(ctx, location.as_deref()),
        Command::Completion { shell } => completion(shell),
    }
}

/// Parse a location argument. Missing, empty and `/` all mean the root.
pub(crate) fn parse_location(raw: Option<&str>) -> Result<Location> {
    match raw.map(|r| r.trim_matches('/')) {
        None | Some("") => Ok(Location::root()),
        Some(value) => {
            Location::new(value).with_context(|| format!("Invalid location '{}'", value))
        }
    }
}

/// Render a location for output; the root prints as `/`.
pub(crate) fn display_location(loc: &Location) -> &str {
    if loc.is_root() {
        "/"
    } else {
        loc.as_str()
    }
}
