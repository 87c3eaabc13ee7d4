use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A runtime entity: one JSON object as exchanged with the API.
///
/// The core assumes nothing about its shape beyond "a set of named values";
/// which attribute identifies it is declared by the schema's key accessor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity {
    fields: Map<String, Value>,
}

impl Entity {
    /// Creates an entity from an attribute map.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Creates an entity from a JSON value, returning `None` unless it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    /// Returns the value of an attribute by name, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Returns the value of an attribute, treating absence as `Null`.
    pub fn get_or_null(&self, name: &str) -> &Value {
        self.fields.get(name).unwrap_or(&Value::Null)
    }

    /// Returns a copy with one attribute replaced. `self` is left untouched.
    pub fn with(&self, name: &str, value: Value) -> Self {
        let mut fields = self.fields.clone();
        fields.insert(name.to_string(), value);
        Self { fields }
    }

    /// Inserts or replaces one attribute in place.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    /// Returns a copy with every attribute of `other` laid over this entity.
    pub fn merged(&self, other: &Entity) -> Self {
        let mut fields = self.fields.clone();
        for (k, v) in &other.fields {
            fields.insert(k.clone(), v.clone());
        }
        Self { fields }
    }

    /// Iterates attributes in insertion order.
    pub fn iter(&self) -> serde_json::map::Iter<'_> {
        self.fields.iter()
    }

    /// Iterates attribute values in insertion order.
    pub fn values(&self) -> serde_json::map::Values<'_> {
        self.fields.values()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

impl From<Map<String, Value>> for Entity {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Entity {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::Object(self.fields.clone()))
    }
}

/// Returns the natural text form of a JSON value: strings as-is, numbers and
/// booleans via their display form, arrays and objects as JSON text.
/// `Null` has no text form.
pub fn value_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        other => Some(Cow::Owned(other.to_string())),
    }
}

/// The identity of an entity within its collection.
///
/// Keys arrive as JSON strings or numbers; both are normalized to their
/// natural string form so `1` and `"1"` address the same row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityKey(String);

impl EntityKey {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Normalizes a JSON key value. Returns `None` for null, empty strings,
    /// and values that cannot identify a row (arrays, objects, booleans).
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntityKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for EntityKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn budi() -> Entity {
        Entity::from_value(json!({"id": 1, "name": "Budi", "status": "Aktif"})).unwrap()
    }

    #[test]
    fn field_access() {
        let e = budi();
        assert_eq!(e.get("name"), Some(&json!("Budi")));
        assert_eq!(e.get("missing"), None);
        assert_eq!(e.get_or_null("missing"), &Value::Null);
        assert_eq!(e.len(), 3);
    }

    #[test]
    fn with_leaves_original_untouched() {
        let e = budi();
        let changed = e.with("name", json!(""));
        assert_eq!(e.get("name"), Some(&json!("Budi")));
        assert_eq!(changed.get("name"), Some(&json!("")));
    }

    #[test]
    fn merged_overlays_attributes() {
        let e = budi();
        let patch = Entity::from_value(json!({"status": "Nonaktif", "email": "b@x.id"})).unwrap();
        let m = e.merged(&patch);
        assert_eq!(m.get("name"), Some(&json!("Budi")));
        assert_eq!(m.get("status"), Some(&json!("Nonaktif")));
        assert_eq!(m.get("email"), Some(&json!("b@x.id")));
    }

    #[test]
    fn value_text_forms() {
        assert_eq!(value_text(&json!("Agus")).as_deref(), Some("Agus"));
        assert_eq!(value_text(&json!(12.5)).as_deref(), Some("12.5"));
        assert_eq!(value_text(&json!(true)).as_deref(), Some("true"));
        assert_eq!(value_text(&json!(["a"])).as_deref(), Some(r#"["a"]"#));
        assert_eq!(value_text(&Value::Null), None);
    }

    #[test]
    fn from_value_rejects_non_objects() {
        assert!(Entity::from_value(json!([1, 2])).is_none());
        assert!(Entity::from_value(json!("x")).is_none());
    }

    #[test]
    fn serde_is_transparent() {
        let e = budi();
        let json = serde_json::to_string(&e).unwrap();
        assert_eq!(json, r#"{"id":1,"name":"Budi","status":"Aktif"}"#);
    }

    #[test]
    fn key_normalization() {
        assert_eq!(EntityKey::from_value(&json!(1)), Some(EntityKey::new("1")));
        assert_eq!(
            EntityKey::from_value(&json!("YK-1")),
            Some(EntityKey::new("YK-1"))
        );
        assert_eq!(EntityKey::from_value(&json!("")), None);
        assert_eq!(EntityKey::from_value(&Value::Null), None);
        assert_eq!(EntityKey::from_value(&json!(true)), None);
    }
}
