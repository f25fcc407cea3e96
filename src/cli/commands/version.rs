//! version command - Print the current version

use crate::cli::Context;
use anyhow::Result;

/// Print the version selected as current.
pub fn version(ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    println!("{}", store.current_version());
    Ok(())
}
