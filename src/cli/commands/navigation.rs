//! parent and children commands - Tree navigation queries

use super::{display_location, parse_location};
use crate::cli::Context;
use crate::store::ConfigStore;
use anyhow::{Context as _, Result};

/// Print the parent location.
///
/// Outputs nothing (exit 0) for the root.
pub fn parent(ctx: &Context, location: &str) -> Result<()> {
    let loc = parse_location(Some(location))?;
    let store = ctx.open_store()?;

    let parent = store
        .parent(Some(&loc))
        .with_context(|| format!("Failed to find parent of '{}'", display_location(&loc)))?;
    if let Some(parent) = parent {
        println!("{}", display_location(&parent));
    }

    Ok(())
}

/// Print child locations, one per line.
///
/// Outputs nothing (exit 0) if the node has no children.
pub fn children(ctx: &Context, location: Option<&str>) -> Result<()> {
    let loc = parse_location(location)?;
    let store = ctx.open_store()?;

    let children = store
        .children(Some(&loc))
        .with_context(|| format!("Failed to list children of '{}'", display_location(&loc)))?;
    for child in &children {
        println!("{}", child);
    }

    Ok(())
}
