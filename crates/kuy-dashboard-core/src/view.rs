//! Table and card layouts over a filtered collection.
//!
//! Both views are pure functions of the entities, the schema, the render
//! context and the row actions. Cards only regroup the cells a table row
//! shows, so the two layouts always display the same values.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::render::{render, Cell, RenderContext};
use crate::types::{Entity, EntityKey, EntitySchema};

/// Header label of the trailing actions column.
pub const ACTION_HEADER: &str = "Action";

/// Placeholder shown when a view has no rows.
pub const EMPTY_MESSAGE: &str = "Tidak ada data yang ditemukan";

/// Title of the card section used when a schema declares none.
pub const DEFAULT_SECTION: &str = "Details";

/// An action offered on one row or card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RowAction {
    Edit { key: EntityKey },
    Delete { key: EntityKey },
    PreviewImage { url: String },
    Custom { name: String, key: EntityKey },
}

impl fmt::Display for RowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Edit { .. } => write!(f, "edit"),
            Self::Delete { .. } => write!(f, "delete"),
            Self::PreviewImage { .. } => write!(f, "preview"),
            Self::Custom { name, .. } => write!(f, "{name}"),
        }
    }
}

type ActionsFn = dyn Fn(&Entity, &EntityKey) -> Vec<RowAction> + Send + Sync;

/// Replaces the default row actions.
#[derive(Clone)]
pub struct ActionsRenderer(Arc<ActionsFn>);

impl ActionsRenderer {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Entity, &EntityKey) -> Vec<RowAction> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, entity: &Entity, key: &EntityKey) -> Vec<RowAction> {
        (self.0)(entity, key)
    }
}

impl fmt::Debug for ActionsRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ActionsRenderer(..)")
    }
}

/// Row identity, falling back to `#<index>` when the key cannot be resolved.
pub fn row_key(schema: &EntitySchema, entity: &Entity, index: usize) -> EntityKey {
    schema
        .key_of(entity)
        .unwrap_or_else(|| EntityKey::new(format!("#{index}")))
}

fn row_actions(
    entity: &Entity,
    key: &EntityKey,
    cells: &[Cell],
    custom: Option<&ActionsRenderer>,
) -> Vec<RowAction> {
    if let Some(custom) = custom {
        return custom.call(entity, key);
    }
    let mut actions = vec![
        RowAction::Edit { key: key.clone() },
        RowAction::Delete { key: key.clone() },
    ];
    actions.extend(cells.iter().filter_map(|c| {
        c.image_url().map(|url| RowAction::PreviewImage {
            url: url.to_string(),
        })
    }));
    actions
}

fn render_row(schema: &EntitySchema, entity: &Entity, ctx: &RenderContext) -> Vec<Cell> {
    schema
        .columns()
        .iter()
        .map(|column| render(column, entity, ctx))
        .collect()
}

// ---------------------------------------------------------------------------
// TableView
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub key: EntityKey,
    pub cells: Vec<Cell>,
    pub actions: Vec<RowAction>,
}

/// One header row plus one row per entity, in collection order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableView {
    pub header: Vec<String>,
    pub rows: Vec<RowView>,
}

impl TableView {
    pub fn build(
        entities: &[Entity],
        schema: &EntitySchema,
        ctx: &RenderContext,
        actions: Option<&ActionsRenderer>,
    ) -> Self {
        let mut header: Vec<String> = schema.columns().iter().map(|c| c.label.clone()).collect();
        header.push(ACTION_HEADER.to_string());

        let rows = entities
            .iter()
            .enumerate()
            .map(|(index, entity)| {
                let key = row_key(schema, entity, index);
                let cells = render_row(schema, entity, ctx);
                let actions = row_actions(entity, &key, &cells, actions);
                RowView {
                    key,
                    cells,
                    actions,
                }
            })
            .collect();

        Self { header, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, key: &EntityKey) -> Option<&RowView> {
        self.rows.iter().find(|r| &r.key == key)
    }
}

// ---------------------------------------------------------------------------
// CardView
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardFieldView {
    pub label: String,
    pub cell: Cell,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionView {
    pub title: String,
    pub fields: Vec<CardFieldView>,
}

/// One card: the key and status badge in the header, then the sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardViewItem {
    pub key: EntityKey,
    pub status: Option<Cell>,
    pub sections: Vec<SectionView>,
    pub actions: Vec<RowAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub items: Vec<CardViewItem>,
}

impl CardView {
    pub fn build(
        entities: &[Entity],
        schema: &EntitySchema,
        ctx: &RenderContext,
        actions: Option<&ActionsRenderer>,
    ) -> Self {
        let items = entities
            .iter()
            .enumerate()
            .map(|(index, entity)| build_card(schema, entity, index, ctx, actions))
            .collect();
        Self { items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn build_card(
    schema: &EntitySchema,
    entity: &Entity,
    index: usize,
    ctx: &RenderContext,
    actions: Option<&ActionsRenderer>,
) -> CardViewItem {
    let key = row_key(schema, entity, index);
    let cells = render_row(schema, entity, ctx);
    let cell_of = |column_key: &str| {
        schema
            .columns()
            .iter()
            .position(|c| c.key.as_str() == column_key)
            .map(|i| cells[i].clone())
    };

    let status = schema.status_column().and_then(|c| cell_of(c.key.as_str()));

    let sections = if schema.card_sections().is_empty() {
        let status_key = schema.status_column().map(|c| c.key.as_str());
        vec![SectionView {
            title: DEFAULT_SECTION.to_string(),
            fields: schema
                .columns()
                .iter()
                .zip(&cells)
                .filter(|(c, _)| Some(c.key.as_str()) != status_key)
                .map(|(c, cell)| CardFieldView {
                    label: c.label.clone(),
                    cell: cell.clone(),
                })
                .collect(),
        }]
    } else {
        schema
            .card_sections()
            .iter()
            .map(|section| SectionView {
                title: section.title.clone(),
                fields: section
                    .fields
                    .iter()
                    .filter_map(|field| {
                        let column = schema.column(field.key.as_str())?;
                        Some(CardFieldView {
                            label: field.label.clone().unwrap_or_else(|| column.label.clone()),
                            cell: cell_of(field.key.as_str())?,
                        })
                    })
                    .collect(),
            })
            .collect()
    };

    let actions = row_actions(entity, &key, &cells, actions);
    CardViewItem {
        key,
        status,
        sections,
        actions,
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Caller callbacks for row actions.
pub trait ViewEvents {
    fn on_edit(&mut self, entity: &Entity);

    fn on_delete(&mut self, key: &EntityKey);

    fn on_preview_image(&mut self, _url: &str) {}

    fn on_custom(&mut self, _name: &str, _key: &EntityKey) {}
}

/// Routes `action`, raised on the row showing `entity`, to `events`.
pub fn dispatch<E: ViewEvents + ?Sized>(action: &RowAction, entity: &Entity, events: &mut E) {
    match action {
        RowAction::Edit { .. } => events.on_edit(entity),
        RowAction::Delete { key } => events.on_delete(key),
        RowAction::PreviewImage { url } => events.on_preview_image(url),
        RowAction::Custom { name, key } => events.on_custom(name, key),
    }
}
