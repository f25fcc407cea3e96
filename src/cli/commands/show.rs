//! show command - Print a node's own configuration

use super::{display_location, parse_location};
use crate::cli::Context;
use crate::store::ConfigStore;
use anyhow::{Context as _, Result};

/// Print the own configuration as TOML, or JSON with `json`.
pub fn show(ctx: &Context, location: Option<&str>, json: bool) -> Result<()> {
    let loc = parse_location(location)?;
    let store = ctx.open_store()?;

    let config = store
        .own_config(Some(&loc))
        .with_context(|| format!("Failed to load config of '{}'", display_location(&loc)))?;

    if json {
        let text = serde_json::to_string_pretty(&config.to_json())
            .context("Failed to render JSON")?;
        println!("{}", text);
        return Ok(());
    }

    if config.is_empty() {
        if !ctx.quiet {
            eprintln!("'{}' has no own configuration", display_location(&loc));
        }
        return Ok(());
    }

    let text = config.to_toml_string().context("Failed to render TOML")?;
    print!("{}", text);
    Ok(())
}
