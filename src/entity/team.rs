use teamql_core::error::QueryError;
use teamql_core::expr::{NonNull, Null, eq};
use teamql_core::projection::{Projection, Selection};
use teamql_core::query::{asc, select_from};
use teamql_core::row::RowReader;
use teamql_core::types::{BigInt, Text};
use teamql_core::{Column, Entity, EntityTable, Executor, Link, RelationPath, Table, Value};

use super::{Member, MemberTable};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Team {
    id: Option<i64>,
    name: Option<String>,
}

impl Team {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
        }
    }

    #[inline]
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Members currently referencing this team, by id.
    ///
    /// The inverse side of `Member::team` is not stored on the team; it is
    /// read from the member table on demand.
    pub fn members<E: Executor + ?Sized>(&self, executor: &E) -> Result<Vec<Member>, QueryError> {
        let Some(id) = self.id else {
            return Ok(Vec::new());
        };
        let member = MemberTable::new();
        select_from(member)
            .r#where(eq(member.team_id, id))
            .order_by(asc(member.id))
            .fetch(executor)
    }
}

impl Entity for Team {
    type Table = TeamTable;

    const TABLE: &'static str = "team";

    const ID_COLUMN: &'static str = "team_id";

    const COLUMNS: &'static [&'static str] = &["name"];

    const DDL: &'static str = "CREATE TABLE IF NOT EXISTS team (\
        team_id INTEGER PRIMARY KEY AUTOINCREMENT, \
        name TEXT)";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn assign_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn values(&self) -> Vec<Value> {
        vec![Value::from(self.name.clone())]
    }
}

/// Query handle of the `team` table.
#[derive(Debug, Clone, Copy)]
pub struct TeamTable {
    alias: &'static str,
    pub id: Column<BigInt, NonNull>,
    pub name: Column<Text, Null>,
}

impl TeamTable {
    pub const fn new() -> Self {
        Self::aliased(Team::TABLE)
    }

    pub const fn aliased(alias: &'static str) -> Self {
        Self {
            alias,
            id: Column::new(alias, "team_id"),
            name: Column::new(alias, "name"),
        }
    }

    /// The one-to-many side of `Member::team`.
    pub const fn members(&self) -> RelationPath<MemberTable> {
        RelationPath::new(
            self.alias,
            "members",
            Link::OneToMany {
                fk: "team_id",
                pk: "team_id",
            },
        )
    }
}

impl Default for TeamTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Table for TeamTable {
    const NAME: &'static str = Team::TABLE;

    fn alias(&self) -> &'static str {
        self.alias
    }
}

impl Projection for TeamTable {
    type Output = Team;

    fn selections(&self) -> Vec<Selection> {
        vec![Selection::of(&self.id), Selection::of(&self.name)]
    }

    fn decode(&self, row: &mut RowReader) -> Result<Team, QueryError> {
        Ok(Team {
            id: Some(row.read()?),
            name: row.read()?,
        })
    }
}

impl EntityTable for TeamTable {
    type Entity = Team;

    fn id_column(&self) -> Column<BigInt, NonNull> {
        self.id
    }
}
