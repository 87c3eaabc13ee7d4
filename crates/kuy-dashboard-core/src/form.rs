//! The schema-driven edit/add form.
//!
//! ```text
//! closed --open_edit/open_add--> open --submit(valid)--> closed
//!                                 |  \--submit(invalid)--> open (errors)
//!                                 \--cancel--> closed
//! ```
//!
//! The draft is a copy. Nothing reaches the source entity until the caller
//! commits the submitted draft through the remote resource.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::types::{value_text, ColumnDescriptor, ColumnKey, Entity, EntityKey, EntitySchema};

// ---------------------------------------------------------------------------
// Draft
// ---------------------------------------------------------------------------

/// The working copy of one entity's attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Draft(Entity);

impl Draft {
    pub fn new(entity: Entity) -> Self {
        Self(entity)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns a new draft with one attribute replaced.
    pub fn with(&self, key: &str, value: Value) -> Self {
        Self(self.0.with(key, value))
    }

    pub fn as_entity(&self) -> &Entity {
        &self.0
    }

    pub fn into_entity(self) -> Entity {
        self.0
    }
}

impl From<Entity> for Draft {
    fn from(entity: Entity) -> Self {
        Self(entity)
    }
}

// ---------------------------------------------------------------------------
// FieldErrors
// ---------------------------------------------------------------------------

/// Inline validation messages keyed by attribute, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(Vec<(ColumnKey, String)>);

impl FieldErrors {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, m)| m.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ColumnKey, &str)> {
        self.0.iter().map(|(k, m)| (k, m.as_str()))
    }

    fn push(&mut self, key: ColumnKey, message: String) {
        self.0.push((key, message));
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|(_, m)| m.as_str()).collect();
        write!(f, "{}", messages.join(" "))
    }
}

// ---------------------------------------------------------------------------
// FormError
// ---------------------------------------------------------------------------

/// Misuse of the form, as opposed to field validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FormError {
    /// The form is closed.
    NotOpen,
    /// The attribute is not an editable column of the schema.
    UnknownField(String),
    /// The value is not one of the column's declared options.
    InvalidOption {
        field: String,
        value: String,
        allowed: Vec<String>,
    },
    /// A `key=value` assignment could not be parsed.
    InvalidAssignment(String),
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotOpen => write!(f, "form is not open"),
            Self::UnknownField(k) => write!(f, "unknown field '{k}'"),
            Self::InvalidOption {
                field,
                value,
                allowed,
            } => write!(
                f,
                "invalid value '{value}' for '{field}': expected one of [{}]",
                allowed.join(", ")
            ),
            Self::InvalidAssignment(s) => {
                write!(f, "invalid assignment '{s}': expected key=value")
            }
        }
    }
}

impl std::error::Error for FormError {}

// ---------------------------------------------------------------------------
// EntityForm
// ---------------------------------------------------------------------------

/// Whether a submitted draft creates or updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FormMode {
    Add,
    /// `key` is `None` when the entity carries no resolvable key; the
    /// caller decides how to address such a draft.
    Edit { key: Option<EntityKey> },
}

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Required fields were missing; the form stays open.
    Invalid(FieldErrors),
    /// The draft passed validation and the form closed.
    Committed { mode: FormMode, draft: Draft },
}

#[derive(Debug, Clone)]
enum FormState {
    Closed,
    Open {
        mode: FormMode,
        draft: Draft,
        errors: FieldErrors,
    },
}

/// Edit/add form bound to one schema.
#[derive(Debug, Clone)]
pub struct EntityForm {
    schema: Arc<EntitySchema>,
    state: FormState,
}

impl EntityForm {
    pub fn new(schema: Arc<EntitySchema>) -> Self {
        Self {
            schema,
            state: FormState::Closed,
        }
    }

    pub fn schema(&self) -> &EntitySchema {
        &self.schema
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, FormState::Open { .. })
    }

    pub fn mode(&self) -> Option<&FormMode> {
        match &self.state {
            FormState::Open { mode, .. } => Some(mode),
            FormState::Closed => None,
        }
    }

    pub fn draft(&self) -> Option<&Draft> {
        match &self.state {
            FormState::Open { draft, .. } => Some(draft),
            FormState::Closed => None,
        }
    }

    pub fn errors(&self) -> Option<&FieldErrors> {
        match &self.state {
            FormState::Open { errors, .. } => Some(errors),
            FormState::Closed => None,
        }
    }

    /// The columns the form edits; the key column is server-assigned.
    pub fn fields(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.schema.form_fields()
    }

    /// Opens the form on a copy of `entity`. Resets any previous draft.
    pub fn open_edit(&mut self, entity: &Entity) {
        let key = self.schema.key_of(entity);
        self.open(FormMode::Edit { key }, Draft::new(entity.clone()));
    }

    /// Opens the form on the schema's add template. Resets any previous draft.
    pub fn open_add(&mut self) {
        let template = self.schema.template().clone();
        self.open(FormMode::Add, Draft::new(template));
    }

    fn open(&mut self, mode: FormMode, draft: Draft) {
        self.state = FormState::Open {
            mode,
            draft,
            errors: FieldErrors::default(),
        };
    }

    /// Replaces one attribute of the draft.
    ///
    /// Choice columns with declared options reject other values; `null`
    /// clears the field.
    pub fn set_field(&mut self, key: &str, value: Value) -> Result<&Draft, FormError> {
        let FormState::Open { draft, .. } = &mut self.state else {
            return Err(FormError::NotOpen);
        };
        let column = self
            .schema
            .form_fields()
            .find(|c| c.key.as_str() == key)
            .ok_or_else(|| FormError::UnknownField(key.to_string()))?;

        if column.constrains_input() && !value.is_null() {
            let text = value_text(&value).unwrap_or_default();
            if !column.options.contains(&text) {
                return Err(FormError::InvalidOption {
                    field: key.to_string(),
                    value: text.into_owned(),
                    allowed: column.options.iter().map(|o| o.value.clone()).collect(),
                });
            }
        }

        *draft = draft.with(key, value);
        Ok(&*draft)
    }

    /// Validates the draft. On success calls `on_submit` then `on_close`
    /// and closes the form; on failure records the errors and stays open.
    pub fn submit<S, C>(&mut self, on_submit: S, on_close: C) -> Result<SubmitOutcome, FormError>
    where
        S: FnOnce(&FormMode, &Draft),
        C: FnOnce(),
    {
        let FormState::Open { draft, errors, mode } = &mut self.state else {
            return Err(FormError::NotOpen);
        };

        let found = validate(&self.schema, draft);
        if !found.is_empty() {
            tracing::debug!(kind = %self.schema.kind, errors = found.len(), "form rejected");
            *errors = found.clone();
            return Ok(SubmitOutcome::Invalid(found));
        }

        on_submit(&*mode, &*draft);
        on_close();

        match std::mem::replace(&mut self.state, FormState::Closed) {
            FormState::Open { mode, draft, .. } => Ok(SubmitOutcome::Committed { mode, draft }),
            FormState::Closed => Err(FormError::NotOpen),
        }
    }

    /// Discards the draft and closes the form.
    pub fn cancel(&mut self) {
        self.state = FormState::Closed;
    }
}

/// Checks every required form field of `draft`. A value that is missing,
/// `null`, or blank after trimming yields `"<label> is required."`.
pub fn validate(schema: &EntitySchema, draft: &Draft) -> FieldErrors {
    let mut errors = FieldErrors::default();
    for column in schema.form_fields().filter(|c| c.required) {
        let missing = match draft.get(column.key.as_str()) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            Some(_) => false,
        };
        if missing {
            errors.push(column.key.clone(), format!("{} is required.", column.label));
        }
    }
    errors
}

/// Parses a `key=value` assignment. The value is kept as a string; only the
/// first `=` separates.
pub fn parse_assignment(s: &str) -> Result<(ColumnKey, Value), FormError> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| FormError::InvalidAssignment(s.to_string()))?;
    let key = ColumnKey::new(key.trim()).map_err(|_| FormError::InvalidAssignment(s.to_string()))?;
    Ok((key, Value::String(value.to_string())))
}
