//! store::tree
//!
//! Parent and children navigation over locations.

use super::{StoreError, VersionedStore};
use crate::core::types::Location;

impl VersionedStore {
    /// Parent of a node.
    ///
    /// `None` and the root location have no parent. The parent is not
    /// checked for existence: it is defined by the path alone.
    ///
    /// # Errors
    ///
    /// Returns `PathOutsideVersionRoot` only if path routing is broken.
    pub fn parent_of(&self, loc: Option<&Location>) -> Result<Option<Location>, StoreError> {
        let loc = match loc {
            Some(loc) if !loc.is_root() => loc,
            _ => return Ok(None),
        };

        let path = self.paths.to_storage_path(loc);
        match path.parent() {
            Some(parent) => Ok(Some(self.paths.to_location(&parent)?)),
            None => Ok(None),
        }
    }

    /// Child nodes of a node, containers only, in backend listing order.
    ///
    /// A location that is missing or a leaf has no children.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `loc` is `None`
    /// - `StorageUnavailable` if the backend fails
    pub fn children_of(&self, loc: Option<&Location>) -> Result<Vec<Location>, StoreError> {
        let loc = loc.ok_or_else(|| {
            StoreError::InvalidArgument("children requires a location".to_string())
        })?;

        let path = self.paths.to_storage_path(loc);
        if !self
            .storage
            .is_container(&path)
            .map_err(|e| StoreError::unavailable(&path, e))?
        {
            tracing::debug!(location = %loc, "not a container, no children");
            return Ok(Vec::new());
        }

        let entries = self
            .storage
            .list_entries(&path)
            .map_err(|e| StoreError::unavailable(&path, e))?;

        let mut children = Vec::new();
        for entry in entries {
            // valid nodes are containers
            if !self
                .storage
                .is_container(&entry)
                .map_err(|e| StoreError::unavailable(&entry, e))?
            {
                continue;
            }
            children.push(self.paths.to_location(&entry)?);
        }
        Ok(children)
    }
}
