//! payload::parser
//!
//! Parser trait and the default TOML implementation.

use std::io::Read;

use super::substitute::resolve;
use super::{Config, ParseError};

/// Turns payload bytes into a self-resolved [`Config`].
///
/// `origin` names the payload in error messages (usually its storage path).
/// Parsers must not hold on to the reader after returning.
pub trait ConfigParser: Send + Sync {
    /// Parse and resolve substitutions within the single document.
    fn parse(&self, reader: &mut dyn Read, origin: &str) -> Result<Config, ParseError>;
}

/// TOML payloads with `${dotted.path}` substitutions.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlParser;

impl ConfigParser for TomlParser {
    fn parse(&self, reader: &mut dyn Read, origin: &str) -> Result<Config, ParseError> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|source| ParseError::Read {
                origin: origin.to_string(),
                source,
            })?;

        let table: toml::Table = toml::from_str(&text).map_err(|e| ParseError::Syntax {
            origin: origin.to_string(),
            message: e.to_string(),
        })?;

        resolve(&table, origin).map(Config::from_table)
    }
}
