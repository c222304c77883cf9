use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Postgres caps identifiers at 63 bytes.
const MAX_IDENTIFIER_LEN: usize = 63;

/// A validated database schema name.
///
/// The schema is interpolated into SQL text (it cannot be a bind parameter),
/// so only plain identifiers are accepted: an ASCII letter or `_` followed by
/// ASCII letters, digits or `_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaName(String);

impl SchemaName {
    pub fn new(name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        let mut chars = name.chars();
        let valid_head = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        let valid_tail = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

        if valid_head && valid_tail && name.len() <= MAX_IDENTIFIER_LEN {
            Ok(Self(name))
        } else {
            Err(ConfigError::InvalidSchemaName(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The schema-qualified, quoted name of `table`, ready for SQL text.
    pub fn qualify(&self, table: &str) -> String {
        format!("\"{}\".\"{table}\"", self.0)
    }
}

impl Default for SchemaName {
    fn default() -> Self {
        Self("public".to_string())
    }
}

impl FromStr for SchemaName {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for SchemaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
