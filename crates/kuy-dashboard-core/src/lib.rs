//! Schema-driven list-view data binding for the Kuy dashboard.
//!
//! Every dashboard page is described by an [`EntitySchema`]: the ordered
//! column descriptors, the card grouping used on narrow layouts, the key
//! attribute, and the status classification. The rest of the crate is a
//! set of pure functions over that schema:
//!
//! - [`search::filter`] narrows a collection by free text,
//! - [`render::render`] turns one attribute into a display [`Cell`],
//! - [`view::TableView`] and [`view::CardView`] lay the cells out,
//! - [`form::EntityForm`] drives the edit/add form and its validation.

pub mod catalog;
pub mod error;
pub mod form;
pub mod render;
pub mod search;
pub mod types;
pub mod view;

pub use error::SchemaError;
pub use form::{
    parse_assignment, validate, Draft, EntityForm, FieldErrors, FormError, FormMode,
    SubmitOutcome,
};
pub use render::{render, BadgeCategory, Cell, RenderContext, StatusResolver};
pub use search::{filter, SearchField, SearchState};
pub use types::{
    value_text, CardField, CardSection, ColumnDescriptor, ColumnKey, ColumnKind, Entity, EntityKey,
    EntityKind, EntitySchema, EntitySchemaBuilder, KeyAccessor, RenderOverride, SelectOption,
    SelectOptions,
};
pub use view::{
    dispatch, ActionsRenderer, CardFieldView, CardView, CardViewItem, RowAction, RowView,
    SectionView, TableView, ViewEvents,
};
