//! Entities and their table handles.

use crate::expr::NonNull;
use crate::projection::Projection;
use crate::schema::{Column, Table};
use crate::types::BigInt;
use crate::value::Value;

/// A persistent record with a surrogate integer identity.
pub trait Entity: Clone + Send + 'static {
    /// Canonical table handle, whose projection decodes whole entities.
    type Table: EntityTable<Entity = Self>;

    const TABLE: &'static str;

    const ID_COLUMN: &'static str;

    /// Non-identity columns, in the order of [`Entity::values`].
    const COLUMNS: &'static [&'static str];

    /// `CREATE TABLE` statement for the entity.
    const DDL: &'static str;

    /// `None` until the entity has been persisted.
    fn id(&self) -> Option<i64>;

    fn assign_id(&mut self, id: i64);

    /// Values of [`Entity::COLUMNS`].
    fn values(&self) -> Vec<Value>;

    /// A relation pointing at an entity without an id, which
    /// [`Entity::values`] cannot store.
    fn unsaved_reference(&self) -> Option<&'static str> {
        None
    }
}

/// A table handle that selects and decodes a whole entity.
pub trait EntityTable: Table + Projection<Output = Self::Entity> + Default {
    type Entity: Entity<Table = Self>;

    fn id_column(&self) -> Column<BigInt, NonNull>;
}
