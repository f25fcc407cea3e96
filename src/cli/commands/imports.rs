//! imports command - List a node's import edges

use super::{display_location, parse_location};
use crate::cli::Context;
use anyhow::Result;

/// Print import targets, one per line.
///
/// With `explain`, dropped include lines follow, prefixed with `dropped:`.
/// Without it, they only reach the log.
pub fn imports(ctx: &Context, location: Option<&str>, explain: bool) -> Result<()> {
    let loc = parse_location(location)?;
    let store = ctx.open_store()?;

    if !explain {
        for target in store.imports_of(Some(&loc)) {
            println!("{}", target);
        }
        return Ok(());
    }

    let resolution = store.resolve_imports(Some(&loc));
    for target in &resolution.imports {
        println!("{}", target);
    }
    for diagnostic in &resolution.diagnostics {
        println!("dropped: {}", diagnostic);
    }
    if !ctx.quiet && resolution.imports.is_empty() && resolution.diagnostics.is_empty() {
        eprintln!("'{}' declares no imports", display_location(&loc));
    }

    Ok(())
}
