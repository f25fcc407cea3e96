//! cfgstore - A read-only, versioned, hierarchical configuration store
//!
//! A store root holds one directory per version. The current version is
//! selected once, when a store is opened; from then on every query reads
//! a tree of nodes under that version. Each node may carry its own
//! payload and an include file listing import edges to other nodes.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to the store)
//! - [`store`] - The store contract and its versioned implementation
//! - [`payload`] - Payload parsing and the configuration value type
//! - [`storage`] - Hierarchical storage abstraction and backends
//! - [`core`] - Domain types, path routing, version policies, settings
//!
//! # Correctness Invariants
//!
//! 1. The store never writes to storage
//! 2. The current version is fixed for the lifetime of a store
//! 3. Queries never escape the current version root
//! 4. Every reader opened on storage is released before a query returns

pub mod cli;
pub mod core;
pub mod payload;
pub mod storage;
pub mod store;
