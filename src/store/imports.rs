//! store::imports
//!
//! Import edge discovery from per-node include files.
//!
//! # Format
//!
//! The include file holds one import per line. Each line is a location
//! anchored at the version root, not at the importing node:
//!
//! ```text
//! teams/shared
//! defaults
//! ```
//!
//! Lines are trimmed and blank lines skipped. A line is kept only if it is
//! a well-formed location naming an existing container.
//!
//! # Diagnostics
//!
//! Resolution is a fold over the lines that yields the accepted edges and
//! one [`ImportDiagnostic`] per dropped line. Nothing here fails the
//! caller: a broken include file means "fewer imports", not an outage.

use std::collections::HashSet;
use std::io::{BufRead, BufReader};

use thiserror::Error;

use super::VersionedStore;
use crate::core::paths::StoragePath;
use crate::core::types::{Location, TypeError};

/// Why an import target was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetProblem {
    /// Nothing exists at the target.
    Missing,
    /// The target exists but is a leaf.
    NotAContainer,
}

impl std::fmt::Display for TargetProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetProblem::Missing => write!(f, "does not exist"),
            TargetProblem::NotAContainer => write!(f, "is not a container"),
        }
    }
}

/// A reason something in an include file was not turned into an edge.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportDiagnostic {
    /// The include entry exists but is a container.
    #[error("include entry '{path}' is not a file")]
    IncludeNotLeaf { path: String },

    /// The include file could not be opened or read; no imports were taken.
    #[error("could not read include file '{path}': {message}")]
    IncludeUnreadable { path: String, message: String },

    /// The line is not a valid location.
    #[error("line {line}: malformed import '{raw}': {reason}")]
    Malformed {
        line: usize,
        raw: String,
        reason: String,
    },

    /// The line names something that is not a valid node.
    #[error("line {line}: import '{target}' {problem}")]
    InvalidTarget {
        line: usize,
        target: Location,
        problem: TargetProblem,
    },

    /// The target could not be checked.
    #[error("line {line}: could not check import '{target}': {message}")]
    TargetUnchecked {
        line: usize,
        target: Location,
        message: String,
    },

    /// The target was already imported on an earlier line.
    #[error("line {line}: duplicate import '{target}'")]
    Duplicate { line: usize, target: Location },
}

/// Accepted import edges plus the reasons anything else was dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportResolution {
    /// Import targets, in declaration order, without duplicates.
    pub imports: Vec<Location>,
    /// One entry per dropped line or unreadable include file.
    pub diagnostics: Vec<ImportDiagnostic>,
}

impl ImportResolution {
    fn failed(diagnostic: ImportDiagnostic) -> Self {
        Self {
            imports: Vec::new(),
            diagnostics: vec![diagnostic],
        }
    }
}

impl VersionedStore {
    /// Resolve a node's imports, keeping diagnostics.
    ///
    /// `None` has no imports. A node without an include file has no
    /// imports and no diagnostics.
    pub fn resolve_imports(&self, loc: Option<&Location>) -> ImportResolution {
        let Some(loc) = loc else {
            return ImportResolution::default();
        };

        let include = self.paths.include_path(loc);
        match self.storage.is_leaf(&include) {
            Ok(true) => {}
            Ok(false) => return self.missing_include(&include),
            Err(e) => {
                return ImportResolution::failed(ImportDiagnostic::IncludeUnreadable {
                    path: include.to_string(),
                    message: e.to_string(),
                })
            }
        }

        let lines = match self.read_lines(&include) {
            Ok(lines) => lines,
            Err(message) => {
                return ImportResolution::failed(ImportDiagnostic::IncludeUnreadable {
                    path: include.to_string(),
                    message,
                })
            }
        };

        let mut seen = HashSet::new();
        lines
            .iter()
            .enumerate()
            .fold(ImportResolution::default(), |mut acc, (idx, raw)| {
                match self.check_line(idx + 1, raw) {
                    LineOutcome::Skip => {}
                    LineOutcome::Accept(target) => {
                        if seen.insert(target.clone()) {
                            acc.imports.push(target);
                        } else {
                            acc.diagnostics.push(ImportDiagnostic::Duplicate {
                                line: idx + 1,
                                target,
                            });
                        }
                    }
                    LineOutcome::Drop(diagnostic) => acc.diagnostics.push(diagnostic),
                }
                acc
            })
    }

    /// Resolve a node's imports, logging every diagnostic as a warning.
    pub fn imports_of(&self, loc: Option<&Location>) -> Vec<Location> {
        let resolution = self.resolve_imports(loc);
        for diagnostic in &resolution.diagnostics {
            tracing::warn!(
                location = loc.map(Location::as_str).unwrap_or_default(),
                "{}",
                diagnostic
            );
        }
        resolution.imports
    }

    /// No include leaf: silent if absent, reported if something else is there.
    fn missing_include(&self, include: &StoragePath) -> ImportResolution {
        match self.storage.exists(include) {
            Ok(false) => ImportResolution::default(),
            Ok(true) => ImportResolution::failed(ImportDiagnostic::IncludeNotLeaf {
                path: include.to_string(),
            }),
            Err(e) => ImportResolution::failed(ImportDiagnostic::IncludeUnreadable {
                path: include.to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// Read the whole include file. The reader is dropped before returning.
    fn read_lines(&self, include: &StoragePath) -> Result<Vec<String>, String> {
        let reader = self.storage.open_read(include).map_err(|e| e.to_string())?;
        BufReader::new(reader)
            .lines()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| e.to_string())
    }

    fn check_line(&self, line: usize, raw: &str) -> LineOutcome {
        let trimmed = raw.trim();
        // a blank line would otherwise import the version root itself
        if trimmed.is_empty() {
            return LineOutcome::Skip;
        }

        let target = match Location::new(trimmed) {
            Ok(target) => target,
            Err(e) => {
                let reason = match e {
                    TypeError::InvalidLocation { reason, .. } => reason,
                    other => other.to_string(),
                };
                return LineOutcome::Drop(ImportDiagnostic::Malformed {
                    line,
                    raw: trimmed.to_string(),
                    reason,
                });
            }
        };

        let path = self.paths.to_storage_path(&target);
        let problem = match self.storage.is_container(&path) {
            Ok(true) => return LineOutcome::Accept(target),
            Ok(false) => self.storage.exists(&path).map(|exists| {
                if exists {
                    TargetProblem::NotAContainer
                } else {
                    TargetProblem::Missing
                }
            }),
            Err(e) => Err(e),
        };

        match problem {
            Ok(problem) => LineOutcome::Drop(ImportDiagnostic::InvalidTarget {
                line,
                target,
                problem,
            }),
            Err(e) => LineOutcome::Drop(ImportDiagnostic::TargetUnchecked {
                line,
                target,
                message: e.to_string(),
            }),
        }
    }
}

enum LineOutcome {
    Skip,
    Accept(Location),
    Drop(ImportDiagnostic),
}
