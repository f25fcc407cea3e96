//! core::version
//!
//! Current-version selection.
//!
//! The set of candidate labels is the container entries directly under
//! the store root. A [`VersionPolicy`] picks the maximal one; the store
//! injects the policy at construction so ordering semantics can change
//! without touching the selection flow.
//!
//! # Example
//!
//! ```
//! use cfgstore::core::version::{select_current_version, LexicographicPolicy, NumericDotPolicy};
//!
//! let labels = vec!["1".to_string(), "2".to_string(), "10".to_string()];
//!
//! let numeric = select_current_version(&NumericDotPolicy, &labels).unwrap();
//! assert_eq!(numeric.as_str(), "10");
//!
//! let lexical = select_current_version(&LexicographicPolicy, &labels).unwrap();
//! assert_eq!(lexical.as_str(), "2");
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::types::Version;

/// Strategy for choosing the current version among candidate labels.
///
/// Implementations must be deterministic: the same set of labels yields
/// the same answer regardless of order. Returning `None` means there is
/// no maximal element (for example, no label parses under the policy).
pub trait VersionPolicy: Send + Sync {
    /// Pick the current label from `candidates`.
    fn select(&self, candidates: &[String]) -> Option<String>;
}

impl<F> VersionPolicy for F
where
    F: Fn(&[String]) -> Option<String> + Send + Sync,
{
    fn select(&self, candidates: &[String]) -> Option<String> {
        self(candidates)
    }
}

/// Treats labels as dot-separated unsigned integers (`1`, `2.10`, `3.0.1`).
///
/// Labels that do not parse are ignored. Labels with equal numeric value
/// (`1.0` and `01.0`) are ordered by their string form.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericDotPolicy;

impl NumericDotPolicy {
    /// One `(digit count, digits)` pair per group, leading zeros stripped.
    /// Comparing the pairs orders groups numerically at any length.
    fn parse(label: &str) -> Option<Vec<(usize, &str)>> {
        label
            .split('.')
            .map(|part| {
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                let digits = part.trim_start_matches('0');
                Some((digits.len(), digits))
            })
            .collect()
    }
}

impl VersionPolicy for NumericDotPolicy {
    fn select(&self, candidates: &[String]) -> Option<String> {
        candidates
            .iter()
            .filter_map(|label| Self::parse(label).map(|key| (key, label)))
            .max_by(|(ka, la), (kb, lb)| ka.cmp(kb).then_with(|| la.cmp(lb)))
            .map(|(_, label)| label.clone())
    }
}

/// Plain string ordering.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicographicPolicy;

impl VersionPolicy for LexicographicPolicy {
    fn select(&self, candidates: &[String]) -> Option<String> {
        candidates.iter().max().cloned()
    }
}

/// Named policies, as written in settings files and CLI flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    /// Dot-separated numeric ordering
    #[default]
    Numeric,
    /// String ordering
    Lexicographic,
}

impl PolicyKind {
    /// Build the policy object.
    pub fn into_policy(self) -> Arc<dyn VersionPolicy> {
        match self {
            PolicyKind::Numeric => Arc::new(NumericDotPolicy),
            PolicyKind::Lexicographic => Arc::new(LexicographicPolicy),
        }
    }
}

/// Select the current version.
///
/// Returns `None` when `candidates` is empty, when the policy finds no
/// maximal element, or when the policy answers with a label that is not
/// one of the candidates or is not a valid [`Version`].
pub fn select_current_version(
    policy: &dyn VersionPolicy,
    candidates: &[String],
) -> Option<Version> {
    if candidates.is_empty() {
        return None;
    }
    let label = policy.select(candidates)?;
    if !candidates.contains(&label) {
        tracing::warn!(label = %label, "version policy selected a label that is not a candidate");
        return None;
    }
    Version::new(label).ok()
}
