mod column;
mod column_key;
mod column_kind;
mod entity;
mod entity_kind;
mod schema;
mod select_option;

pub use column::{ColumnDescriptor, RenderOverride};
pub use column_key::ColumnKey;
pub use column_kind::ColumnKind;
pub use entity::{value_text, Entity, EntityKey};
pub use entity_kind::EntityKind;
pub use schema::{CardField, CardSection, EntitySchema, EntitySchemaBuilder, KeyAccessor};
pub use select_option::{SelectOption, SelectOptions};
