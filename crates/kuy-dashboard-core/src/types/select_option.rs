use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SchemaError;

/// One choice of a select or status column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    /// Creates an option whose label differs from its stored value.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Creates an option whose label is its value.
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }
}

/// An ordered, deduplicated list of options. May be empty for columns that
/// do not constrain input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SelectOptions(Vec<SelectOption>);

impl SelectOptions {
    /// Creates a new `SelectOptions`, validating:
    /// - no empty values
    /// - no duplicate values
    pub fn new(options: Vec<SelectOption>) -> Result<Self, SchemaError> {
        let mut seen = HashSet::with_capacity(options.len());
        for o in &options {
            if o.value.is_empty() {
                return Err(SchemaError::EmptyOptionValue);
            }
            if !seen.insert(o.value.as_str()) {
                return Err(SchemaError::DuplicateOption(o.value.clone()));
            }
        }
        Ok(Self(options))
    }

    /// Builds options whose labels equal their values.
    pub fn plain<I, S>(values: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(values.into_iter().map(SelectOption::plain).collect())
    }

    /// Returns no options.
    pub fn none() -> Self {
        Self(Vec::new())
    }

    pub fn as_slice(&self) -> &[SelectOption] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SelectOption> {
        self.0.iter()
    }

    /// Returns true if `value` is one of the declared option values.
    pub fn contains(&self, value: &str) -> bool {
        self.0.iter().any(|o| o.value == value)
    }

    /// Returns the label for a stored value, if the value is declared.
    pub fn label_for(&self, value: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label.as_str())
    }
}

impl fmt::Display for SelectOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<&str> = self.0.iter().map(|o| o.value.as_str()).collect();
        write!(f, "[{}]", values.join(", "))
    }
}

impl Serialize for SelectOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SelectOptions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let options = Vec::<SelectOption>::deserialize(deserializer)?;
        Self::new(options).map_err(serde::de::Error::custom)
    }
}
