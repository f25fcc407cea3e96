//! store::own_config
//!
//! A node's own payload, parsed but not merged with its imports.

use std::io::Read;

use super::{StoreError, VersionedStore};
use crate::core::types::Location;
use crate::payload::Config;
use crate::storage::StorageError;

impl VersionedStore {
    /// The node's own, self-resolved configuration.
    ///
    /// `None`, nodes without a payload, and payload entries that are not
    /// leaves all yield the empty configuration.
    ///
    /// # Errors
    ///
    /// - `StorageUnavailable` if the backend fails to check, open or read the payload
    /// - `Parse` if the payload is not valid
    pub fn own_config_of(&self, loc: Option<&Location>) -> Result<Config, StoreError> {
        let Some(loc) = loc else {
            return Ok(Config::empty());
        };

        let payload = self.paths.payload_path(loc);
        let is_leaf = self
            .storage
            .is_leaf(&payload)
            .map_err(|e| StoreError::unavailable(&payload, e))?;
        if !is_leaf {
            tracing::debug!(location = %loc, "no payload, empty config");
            return Ok(Config::empty());
        }

        // read failures are backend faults, not parse errors
        let bytes = {
            let mut reader = self
                .storage
                .open_read(&payload)
                .map_err(|e| StoreError::unavailable(&payload, e))?;
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes).map_err(|e| {
                StoreError::unavailable(&payload, StorageError::io(&payload, e))
            })?;
            bytes
        };

        let origin = payload.to_string();
        self.parser
            .parse(&mut bytes.as_slice(), &origin)
            .map_err(|source| StoreError::Parse {
                path: origin.clone(),
                source,
            })
    }
}
