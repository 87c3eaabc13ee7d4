use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::types::{value_text, ColumnKey, Entity};

/// Which attributes a search looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SearchField {
    /// Every attribute value of the entity.
    #[default]
    All,
    /// A single attribute.
    Column(ColumnKey),
}

impl FromStr for SearchField {
    type Err = SchemaError;

    /// Parses `"all"` or an attribute name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            ColumnKey::new(s).map(Self::Column)
        }
    }
}

impl TryFrom<String> for SearchField {
    type Error = SchemaError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<SearchField> for String {
    fn from(field: SearchField) -> Self {
        field.to_string()
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Column(key) => write!(f, "{key}"),
        }
    }
}

/// Free-text search input plus the attribute scope it applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchState {
    pub text: String,
    #[serde(default)]
    pub field: SearchField,
}

impl SearchState {
    /// A search over every attribute.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            field: SearchField::All,
        }
    }

    /// Restricts the search to one attribute.
    pub fn in_field(mut self, field: SearchField) -> Self {
        self.field = field;
        self
    }

    /// True when the search text is empty and every entity passes unfiltered.
    pub fn is_identity(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns true if `entity` satisfies this search.
    pub fn matches(&self, entity: &Entity) -> bool {
        let term = self.text.trim().to_lowercase();
        matches_term(&term, &self.field, entity)
    }
}

fn contains_term(value: &str, term: &str) -> bool {
    value.to_lowercase().contains(term)
}

fn matches_term(term: &str, field: &SearchField, entity: &Entity) -> bool {
    match field {
        SearchField::All => entity
            .values()
            .filter_map(value_text)
            .any(|text| contains_term(&text, term)),
        SearchField::Column(key) => {
            let text = value_text(entity.get_or_null(key.as_str())).unwrap_or_default();
            contains_term(&text, term)
        }
    }
}

/// Narrows `entities` to those matching `search`, preserving order.
///
/// Empty search text returns the input borrowed, without copying. Matching
/// is a case-insensitive substring test on the trimmed term; `null` values
/// never match under [`SearchField::All`], and a missing or `null` attribute
/// searched by name is treated as the empty string.
pub fn filter<'a>(entities: &'a [Entity], search: &SearchState) -> Cow<'a, [Entity]> {
    if search.is_identity() {
        return Cow::Borrowed(entities);
    }
    let term = search.text.trim().to_lowercase();
    let matched: Vec<Entity> = entities
        .iter()
        .filter(|e| matches_term(&term, &search.field, e))
        .cloned()
        .collect();
    tracing::trace!(
        term = %term,
        field = %search.field,
        total = entities.len(),
        matched = matched.len(),
        "filtered collection"
    );
    Cow::Owned(matched)
}
