use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::render::StatusResolver;

use super::column::ColumnDescriptor;
use super::column_key::ColumnKey;
use super::column_kind::ColumnKind;
use super::entity::{Entity, EntityKey};
use super::entity_kind::EntityKind;

/// Resolves the identity of an entity.
///
/// Entity types name their key differently (`id`, `pickup_id`,
/// `delivery_id`), so row identity is never read from a fixed attribute.
#[derive(Debug, Clone)]
pub enum KeyAccessor {
    /// Read the key from one attribute.
    Attribute(ColumnKey),
    /// Derive the key with a function.
    Custom(fn(&Entity) -> Option<EntityKey>),
}

impl KeyAccessor {
    pub fn key_of(&self, entity: &Entity) -> Option<EntityKey> {
        match self {
            Self::Attribute(attr) => entity
                .get(attr.as_str())
                .and_then(EntityKey::from_value),
            Self::Custom(f) => f(entity),
        }
    }

    /// The attribute holding the key, when the accessor reads one directly.
    pub fn attribute(&self) -> Option<&ColumnKey> {
        match self {
            Self::Attribute(attr) => Some(attr),
            Self::Custom(_) => None,
        }
    }
}

/// A field shown inside a card section. The label defaults to the column label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardField {
    pub key: ColumnKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl CardField {
    pub fn new(key: ColumnKey) -> Self {
        Self { key, label: None }
    }

    pub fn labeled(key: ColumnKey, label: impl Into<String>) -> Self {
        Self {
            key,
            label: Some(label.into()),
        }
    }
}

/// A named group of fields in the card layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSection {
    pub title: String,
    pub fields: Vec<CardField>,
}

impl CardSection {
    pub fn new(title: impl Into<String>, fields: Vec<CardField>) -> Self {
        Self {
            title: title.into(),
            fields,
        }
    }
}

/// Everything one list page needs: descriptors, card grouping, identity,
/// status classification, the remote endpoint, and the add-mode template.
///
/// Descriptors are immutable once built; share the schema behind an `Arc`.
#[derive(Debug, Clone)]
pub struct EntitySchema {
    pub kind: EntityKind,
    pub title: String,
    pub subtitle: String,
    pub endpoint: String,
    pub key_accessor: KeyAccessor,
    pub status_resolver: StatusResolver,
    columns: Vec<ColumnDescriptor>,
    card_sections: Vec<CardSection>,
    template: Entity,
}

impl EntitySchema {
    /// Starts a schema for `kind` whose rows are identified by `key_attribute`.
    pub fn builder(kind: &str, key_attribute: &str) -> EntitySchemaBuilder {
        EntitySchemaBuilder {
            kind: kind.to_string(),
            key_attribute: key_attribute.to_string(),
            custom_key: None,
            title: String::new(),
            subtitle: String::new(),
            endpoint: None,
            status_resolver: None,
            columns: Vec::new(),
            card_sections: Vec::new(),
            template: Entity::default(),
        }
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn card_sections(&self) -> &[CardSection] {
        &self.card_sections
    }

    /// Looks up a column by key.
    pub fn column(&self, key: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.key.as_str() == key)
    }

    /// Resolves the row identity of `entity`.
    pub fn key_of(&self, entity: &Entity) -> Option<EntityKey> {
        self.key_accessor.key_of(entity)
    }

    /// The first status column, shown in the card header.
    pub fn status_column(&self) -> Option<&ColumnDescriptor> {
        self.columns
            .iter()
            .find(|c| matches!(c.kind, ColumnKind::Status))
    }

    /// Columns offered by the edit/add form: everything but the key column.
    pub fn form_fields(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        let key_attr = self.key_accessor.attribute().cloned();
        self.columns
            .iter()
            .filter(move |c| key_attr.as_ref() != Some(&c.key))
    }

    /// The draft an add form starts from.
    pub fn template(&self) -> &Entity {
        &self.template
    }
}

impl fmt::Display for EntitySchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({}) {{", self.kind, self.endpoint)?;
        for column in &self.columns {
            writeln!(f, "  {column}")?;
        }
        write!(f, "}}")
    }
}

/// Builder for [`EntitySchema`]; validation happens in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct EntitySchemaBuilder {
    kind: String,
    key_attribute: String,
    custom_key: Option<fn(&Entity) -> Option<EntityKey>>,
    title: String,
    subtitle: String,
    endpoint: Option<String>,
    status_resolver: Option<StatusResolver>,
    columns: Vec<ColumnDescriptor>,
    card_sections: Vec<CardSection>,
    template: Entity,
}

impl EntitySchemaBuilder {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    /// Collection endpoint path, e.g. `/api/blogs`. Defaults to `/api/<kind>`.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Replaces the attribute key accessor with a function.
    pub fn key_fn(mut self, f: fn(&Entity) -> Option<EntityKey>) -> Self {
        self.custom_key = Some(f);
        self
    }

    pub fn status_resolver(mut self, resolver: StatusResolver) -> Self {
        self.status_resolver = Some(resolver);
        self
    }

    pub fn column(mut self, column: ColumnDescriptor) -> Self {
        self.columns.push(column);
        self
    }

    pub fn card_section(mut self, section: CardSection) -> Self {
        self.card_sections.push(section);
        self
    }

    pub fn template(mut self, template: Entity) -> Self {
        self.template = template;
        self
    }

    /// Validates and builds the schema:
    /// - kind and key attribute are well-formed
    /// - at least one column, no duplicate keys
    /// - select columns declare options
    /// - card sections only reference declared columns
    pub fn build(self) -> Result<EntitySchema, SchemaError> {
        let kind = EntityKind::new(self.kind)?;
        let key_attr = ColumnKey::new(&self.key_attribute)
            .map_err(|_| SchemaError::InvalidKeyAttribute(self.key_attribute.clone()))?;

        if self.columns.is_empty() {
            return Err(SchemaError::EmptyColumns);
        }

        let mut keys = HashSet::with_capacity(self.columns.len());
        for c in &self.columns {
            if !keys.insert(c.key.as_str()) {
                return Err(SchemaError::DuplicateColumnKey(c.key.to_string()));
            }
            if matches!(c.kind, ColumnKind::Select) && c.options.is_empty() {
                return Err(SchemaError::MissingOptions(c.key.to_string()));
            }
        }

        for section in &self.card_sections {
            for field in &section.fields {
                if !keys.contains(field.key.as_str()) {
                    return Err(SchemaError::UnknownCardField(field.key.to_string()));
                }
            }
        }

        let endpoint = self
            .endpoint
            .unwrap_or_else(|| format!("/api/{}", kind.as_str()));
        let status_resolver = self
            .status_resolver
            .unwrap_or_else(|| StatusResolver::for_kind(&kind));
        let key_accessor = match self.custom_key {
            Some(f) => KeyAccessor::Custom(f),
            None => KeyAccessor::Attribute(key_attr),
        };

        Ok(EntitySchema {
            kind,
            title: self.title,
            subtitle: self.subtitle,
            endpoint,
            key_accessor,
            status_resolver,
            columns: self.columns,
            card_sections: self.card_sections,
            template: self.template,
        })
    }
}
