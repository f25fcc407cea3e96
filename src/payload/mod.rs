//! payload
//!
//! Node configuration payloads and the parser seam.
//!
//! # Overview
//!
//! A node's own payload is parsed by a [`ConfigParser`] into a [`Config`]:
//! a tree of TOML values with every intra-document substitution already
//! resolved. Merging configuration across import edges is not done here.
//!
//! # Example
//!
//! ```
//! use cfgstore::payload::{ConfigParser, TomlParser};
//!
//! let text = "name = \"alpha\"\n[db]\nurl = \"postgres://${name}/main\"\n";
//! let config = TomlParser.parse(&mut text.as_bytes(), "inline").unwrap();
//! assert_eq!(config.get_str("db.url"), Some("postgres://alpha/main"));
//! ```

mod parser;
mod substitute;

pub use parser::{ConfigParser, TomlParser};

use serde::Serialize;
use thiserror::Error;
use toml::{Table, Value};

/// Errors from payload parsing and substitution.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read payload '{origin}': {source}")]
    Read {
        origin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse payload '{origin}': {message}")]
    Syntax { origin: String, message: String },

    #[error("unresolved substitution '${{{path}}}' in '{origin}'")]
    UnresolvedSubstitution { origin: String, path: String },

    #[error("substitution cycle through '${{{path}}}' in '{origin}'")]
    SubstitutionCycle { origin: String, path: String },

    #[error("malformed substitution in '{origin}': {message}")]
    MalformedSubstitution { origin: String, message: String },

    #[error("cannot interpolate non-scalar '${{{path}}}' into a string in '{origin}'")]
    NonScalarInterpolation { origin: String, path: String },
}

/// A node's self-resolved configuration.
///
/// The empty configuration is a normal value: nodes without a payload
/// have one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Config(Table);

impl Config {
    /// The empty configuration.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap an already resolved table.
    pub fn from_table(table: Table) -> Self {
        Self(table)
    }

    /// Whether there are no keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up a dotted path (`db.url`).
    pub fn get(&self, path: &str) -> Option<&Value> {
        lookup(&self.0, path)
    }

    /// Look up a dotted path holding a string.
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    /// Top-level table.
    pub fn as_table(&self) -> &Table {
        &self.0
    }

    /// Consume into the top-level table.
    pub fn into_table(self) -> Table {
        self.0
    }

    /// Render as TOML text.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&self.0)
    }

    /// Render as a JSON value. Datetimes become RFC 3339 strings.
    pub fn to_json(&self) -> serde_json::Value {
        table_to_json(&self.0)
    }
}

/// Dotted-path lookup shared by [`Config::get`] and the substitution resolver.
pub(crate) fn lookup<'a>(table: &'a Table, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let mut current = table.get(parts.next()?)?;
    for part in parts {
        current = current.as_table()?.get(part)?;
    }
    Some(current)
}

fn table_to_json(table: &Table) -> serde_json::Value {
    serde_json::Value::Object(
        table
            .iter()
            .map(|(k, v)| (k.clone(), value_to_json(v)))
            .collect(),
    )
}

fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Integer(i) => serde_json::Value::from(*i),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        Value::Array(items) => serde_json::Value::Array(items.iter().map(value_to_json).collect()),
        Value::Table(t) => table_to_json(t),
    }
}
