use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// A validated lower-case entity type identifier such as `pickups` or `users`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityKind(String);

impl EntityKind {
    /// Entity kind whose status column uses the account (aktif/nonaktif) resolver.
    pub const USERS: &'static str = "users";

    /// Creates a new `EntityKind`, validating `[a-z][a-z0-9_-]*`.
    pub fn new(s: impl Into<String>) -> Result<Self, SchemaError> {
        let s = s.into();
        if !is_kind_name(&s) {
            return Err(SchemaError::InvalidEntityKind(s));
        }
        Ok(Self(s))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the admin-user entity type.
    pub fn is_users(&self) -> bool {
        self.0 == Self::USERS
    }
}

fn is_kind_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<EntityKind> for String {
    fn from(k: EntityKind) -> String {
        k.0
    }
}

impl TryFrom<String> for EntityKind {
    type Error = SchemaError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl AsRef<str> for EntityKind {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_kinds() {
        for kind in ["pickups", "users", "point-redemptions", "blogs2"] {
            assert!(EntityKind::new(kind).is_ok(), "expected valid: {kind}");
        }
    }

    #[test]
    fn invalid_kinds() {
        for kind in ["", "Users", "-x", "9lives", "a b"] {
            assert!(EntityKind::new(kind).is_err(), "expected invalid: {kind}");
        }
    }

    #[test]
    fn users_detection() {
        assert!(EntityKind::new("users").unwrap().is_users());
        assert!(!EntityKind::new("blogs").unwrap().is_users());
    }
}
