//! tree command - Print the node hierarchy with import edges
//!
//! ```text
//! /
//! ├── teamA  -> teamB
//! │   └── db
//! └── teamB
//! ```

use std::fmt::Write as _;

use super::{display_location, parse_location};
use crate::cli::Context;
use crate::core::types::Location;
use crate::store::{ConfigStore, StoreError};
use anyhow::{Context as _, Result};

/// Print the subtree under a node.
pub fn tree(ctx: &Context, location: Option<&str>) -> Result<()> {
    let loc = parse_location(location)?;
    let store = ctx.open_store()?;

    let rendered = render(&store, &loc)
        .with_context(|| format!("Failed to walk tree at '{}'", display_location(&loc)))?;
    print!("{}", rendered);
    Ok(())
}

/// Levels below the starting node that are walked. Symlinked directory
/// loops look like an endless chain of distinct locations.
pub const MAX_DEPTH: usize = 24;

/// Render a subtree. Each node is labelled with its last segment and
/// followed by its imports.
pub fn render(store: &dyn ConfigStore, loc: &Location) -> Result<String, StoreError> {
    render_with_limit(store, loc, MAX_DEPTH)
}

/// Render a subtree, replacing anything deeper than `max_depth` levels
/// with a `...` marker.
pub fn render_with_limit(
    store: &dyn ConfigStore,
    loc: &Location,
    max_depth: usize,
) -> Result<String, StoreError> {
    let mut out = String::new();
    out.push_str(display_location(loc));
    push_imports(&mut out, store, loc);
    out.push('\n');
    render_children(&mut out, store, loc, "", 0, max_depth)?;
    Ok(out)
}

fn render_children(
    out: &mut String,
    store: &dyn ConfigStore,
    loc: &Location,
    prefix: &str,
    depth: usize,
    max_depth: usize,
) -> Result<(), StoreError> {
    let children = store.children(Some(loc))?;
    let count = children.len();

    if depth >= max_depth {
        if count > 0 {
            tracing::warn!(location = %loc, max_depth, "tree depth limit reached");
            out.push_str(prefix);
            out.push_str("└── ...\n");
        }
        return Ok(());
    }

    for (idx, child) in children.iter().enumerate() {
        let last = idx + 1 == count;
        let branch = if last { "└── " } else { "├── " };
        out.push_str(prefix);
        out.push_str(branch);
        out.push_str(child.name().unwrap_or_default());
        push_imports(out, store, child);
        out.push('\n');

        let next = format!("{}{}", prefix, if last { "    " } else { "│   " });
        render_children(out, store, child, &next, depth + 1, max_depth)?;
    }
    Ok(())
}

fn push_imports(out: &mut String, store: &dyn ConfigStore, loc: &Location) {
    let imports = store.imports(Some(loc));
    if imports.is_empty() {
        return;
    }
    let joined = imports
        .iter()
        .map(Location::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let _ = write!(out, "  -> {}", joined);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::core::paths::StoragePath;
    use crate::storage::MemoryStorage;
    use crate::store::VersionedStore;

    #[test]
    fn renders_hierarchy_and_imports() {
        let storage = MemoryStorage::new()
            .with_container("/s/1/teamA/db")
            .with_container("/s/1/teamB")
            .with_leaf("/s/1/teamA/includes", "teamB\nmissing\n");
        let store =
            VersionedStore::open("memory", StoragePath::parse("/s").unwrap(), Arc::new(storage))
                .unwrap();

        let rendered = render(&store, &Location::root()).unwrap();
        assert_eq!(
            rendered,
            "/\n├── teamA  -> teamB\n│   └── db\n└── teamB\n"
        );
    }

    #[test]
    fn renders_subtree() {
        let storage = MemoryStorage::new().with_container("/s/1/a/b/c");
        let store =
            VersionedStore::open("memory", StoragePath::parse("/s").unwrap(), Arc::new(storage))
                .unwrap();

        let rendered = render(&store, &Location::new("a/b").unwrap()).unwrap();
        assert_eq!(rendered, "a/b\n└── c\n");
    }

    #[test]
    fn depth_limit_marks_truncated_subtrees() {
        let storage = MemoryStorage::new()
            .with_container("/s/1/a/b/c/d")
            .with_container("/s/1/x");
        let store =
            VersionedStore::open("memory", StoragePath::parse("/s").unwrap(), Arc::new(storage))
                .unwrap();

        let rendered = render_with_limit(&store, &Location::root(), 2).unwrap();
        assert_eq!(
            rendered,
            "/\n├── a\n│   └── b\n│       └── ...\n└── x\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn symlink_loop_terminates() {
        use crate::storage::LocalStorage;
        use tempfile::TempDir;

        let temp = TempDir::new().unwrap();
        let version_root = temp.path().join("1");
        std::fs::create_dir_all(version_root.join("a")).unwrap();
        std::os::unix::fs::symlink(&version_root, version_root.join("a/loop")).unwrap();

        let root = StoragePath::parse(temp.path().to_str().unwrap()).unwrap();
        let store = VersionedStore::open("file", root, Arc::new(LocalStorage::new())).unwrap();

        let rendered = render(&store, &Location::root()).unwrap();
        assert!(rendered.starts_with("/\n└── a\n    └── loop\n        └── a\n"));
        assert!(rendered.ends_with("└── ...\n"));
        assert_eq!(rendered.lines().count(), MAX_DEPTH + 2);
    }
}
