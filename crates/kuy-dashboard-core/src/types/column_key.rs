use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// A validated attribute name matching `[A-Za-z][A-Za-z0-9_]*`.
///
/// The dashboard API mixes `snake_case` (`pickup_id`) and `camelCase`
/// (`tanggalPublikasi`) attribute names, so both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColumnKey(String);

impl ColumnKey {
    /// Creates a new `ColumnKey`, validating the attribute-name format.
    pub fn new(s: impl Into<String>) -> Result<Self, SchemaError> {
        let s = s.into();
        if !is_attribute_name(&s) {
            return Err(SchemaError::InvalidColumnKey(s));
        }
        Ok(Self(s))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_attribute_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ColumnKey> for String {
    fn from(k: ColumnKey) -> String {
        k.0
    }
}

impl TryFrom<String> for ColumnKey {
    type Error = SchemaError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl AsRef<str> for ColumnKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
