use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::column_key::ColumnKey;
use super::column_kind::ColumnKind;
use super::entity::Entity;
use super::select_option::SelectOptions;
use crate::render::Cell;

type RenderFn = dyn Fn(&Value, &Entity) -> Cell + Send + Sync;

/// A caller-supplied cell renderer that takes precedence over the built-in
/// kind dispatch. Receives the raw value (`Null` when absent) and the row.
#[derive(Clone)]
pub struct RenderOverride(Arc<RenderFn>);

impl RenderOverride {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value, &Entity) -> Cell + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, value: &Value, entity: &Entity) -> Cell {
        (self.0)(value, entity)
    }
}

impl fmt::Debug for RenderOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RenderOverride(..)")
    }
}

/// Describes how one attribute is labeled, rendered, and edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub key: ColumnKey,
    pub label: String,
    pub kind: ColumnKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "SelectOptions::is_empty")]
    pub options: SelectOptions,
    #[serde(skip)]
    pub render: Option<RenderOverride>,
}

impl ColumnDescriptor {
    /// Creates an optional column with no options or override.
    pub fn new(key: ColumnKey, label: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            key,
            label: label.into(),
            kind,
            required: false,
            options: SelectOptions::none(),
            render: None,
        }
    }

    /// Shorthand for a plain text column.
    pub fn text(key: ColumnKey, label: impl Into<String>) -> Self {
        Self::new(key, label, ColumnKind::Text)
    }

    /// Marks the column as required in the edit/add form.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Declares the allowed values of a select or status column.
    pub fn with_options(mut self, options: SelectOptions) -> Self {
        self.options = options;
        self
    }

    /// Installs a render override.
    pub fn with_render<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &Entity) -> Cell + Send + Sync + 'static,
    {
        self.render = Some(RenderOverride::new(f));
        self
    }

    /// Returns true if the form must reject values outside `options`.
    pub fn constrains_input(&self) -> bool {
        self.kind.is_choice() && !self.options.is_empty()
    }
}

impl PartialEq for ColumnDescriptor {
    /// Overrides are compared by presence only; closures have no equality.
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
            && self.label == other.label
            && self.kind == other.kind
            && self.required == other.required
            && self.options == other.options
            && self.render.is_some() == other.render.is_some()
    }
}

impl fmt::Display for ColumnDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.key, self.label, self.kind)?;
        if self.required {
            write!(f, " @required")?;
        }
        if !self.options.is_empty() {
            write!(f, " {}", self.options)?;
        }
        Ok(())
    }
}
