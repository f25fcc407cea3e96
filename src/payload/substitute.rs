//! payload::substitute
//!
//! Intra-document `${dotted.path}` substitution.
//!
//! A string that is exactly one substitution takes the referenced value,
//! whatever its type. Substitutions inside longer strings are interpolated
//! and must reference scalars. References are looked up in the document
//! as written and resolved recursively; a reference that reaches itself
//! again is a cycle.

use toml::{Table, Value};

use super::{lookup, ParseError};

enum Piece<'a> {
    Text(&'a str),
    Ref(&'a str),
}

struct Resolver<'a> {
    root: &'a Table,
    origin: &'a str,
    /// References currently being resolved, innermost last.
    stack: Vec<String>,
}

/// Resolve every substitution in `table`.
pub(crate) fn resolve(table: &Table, origin: &str) -> Result<Table, ParseError> {
    let mut resolver = Resolver {
        root: table,
        origin,
        stack: Vec::new(),
    };
    resolver.table(table)
}

impl<'a> Resolver<'a> {
    fn table(&mut self, table: &Table) -> Result<Table, ParseError> {
        let mut out = Table::new();
        for (key, value) in table {
            out.insert(key.clone(), self.value(value)?);
        }
        Ok(out)
    }

    fn value(&mut self, value: &Value) -> Result<Value, ParseError> {
        match value {
            Value::String(s) => self.string(s),
            Value::Array(items) => items
                .iter()
                .map(|item| self.value(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Value::Table(t) => self.table(t).map(Value::Table),
            other => Ok(other.clone()),
        }
    }

    fn string(&mut self, s: &str) -> Result<Value, ParseError> {
        let pieces = self.split(s)?;

        if let [Piece::Ref(path)] = pieces.as_slice() {
            return self.reference(path);
        }

        let mut out = String::with_capacity(s.len());
        for piece in pieces {
            match piece {
                Piece::Text(text) => out.push_str(text),
                Piece::Ref(path) => match self.reference(path)? {
                    Value::String(v) => out.push_str(&v),
                    Value::Integer(v) => out.push_str(&v.to_string()),
                    Value::Float(v) => out.push_str(&v.to_string()),
                    Value::Boolean(v) => out.push_str(&v.to_string()),
                    Value::Datetime(v) => out.push_str(&v.to_string()),
                    Value::Array(_) | Value::Table(_) => {
                        return Err(ParseError::NonScalarInterpolation {
                            origin: self.origin.to_string(),
                            path: path.to_string(),
                        })
                    }
                },
            }
        }
        Ok(Value::String(out))
    }

    fn reference(&mut self, path: &str) -> Result<Value, ParseError> {
        if self.stack.iter().any(|p| p == path) {
            return Err(ParseError::SubstitutionCycle {
                origin: self.origin.to_string(),
                path: path.to_string(),
            });
        }

        let raw = lookup(self.root, path).ok_or_else(|| ParseError::UnresolvedSubstitution {
            origin: self.origin.to_string(),
            path: path.to_string(),
        })?;

        self.stack.push(path.to_string());
        let resolved = self.value(raw);
        self.stack.pop();
        resolved
    }

    fn split<'s>(&self, s: &'s str) -> Result<Vec<Piece<'s>>, ParseError> {
        let mut pieces = Vec::new();
        let mut rest = s;
        while let Some(start) = rest.find("${") {
            if start > 0 {
                pieces.push(Piece::Text(&rest[..start]));
            }
            let after = &rest[start + 2..];
            let end = after.find('}').ok_or_else(|| self.malformed(s, "unterminated '${'"))?;
            let path = after[..end].trim();
            if path.is_empty() || path.split('.').any(str::is_empty) {
                return Err(self.malformed(s, "empty substitution path"));
            }
            pieces.push(Piece::Ref(path));
            rest = &after[end + 1..];
        }
        if !rest.is_empty() {
            pieces.push(Piece::Text(rest));
        }
        Ok(pieces)
    }

    fn malformed(&self, s: &str, reason: &str) -> ParseError {
        ParseError::MalformedSubstitution {
            origin: self.origin.to_string(),
            message: format!("{reason} in \"{s}\""),
        }
    }
}
