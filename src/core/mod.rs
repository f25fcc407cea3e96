//! core
//!
//! Core domain types, path routing, version selection and settings.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Location, Version
//! - [`paths`] - Storage paths and routing from locations to entries
//! - [`version`] - Version ordering policies and selection
//! - [`settings`] - Settings schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Schemas are strict and self-describing
//! - Version selection is deterministic

pub mod paths;
pub mod settings;
pub mod types;
pub mod version;
