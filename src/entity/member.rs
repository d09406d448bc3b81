use teamql_core::error::{BuildError, QueryError};
use teamql_core::expr::{Null, NonNull};
use teamql_core::projection::{FetchJoin, Projection, Selection, optional};
use teamql_core::row::RowReader;
use teamql_core::types::{BigInt, Int, Text};
use teamql_core::{Column, Entity, EntityTable, Link, RelationPath, Table, Value};

use super::{Association, Team, TeamTable};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Member {
    id: Option<i64>,
    username: Option<String>,
    age: i32,
    team: Association<Team>,
}

impl Member {
    pub fn new(username: impl Into<String>, age: i32) -> Self {
        Self {
            id: None,
            username: Some(username.into()),
            age,
            team: Association::Unassigned,
        }
    }

    /// A member without a username.
    pub fn anonymous(age: i32) -> Self {
        Self {
            age,
            ..Self::default()
        }
    }

    pub fn with_team(username: impl Into<String>, age: i32, team: &Team) -> Self {
        let mut member = Self::new(username, age);
        member.change_team(team);
        member
    }

    #[inline]
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    #[inline]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    #[inline]
    pub fn age(&self) -> i32 {
        self.age
    }

    #[inline]
    pub fn team(&self) -> &Association<Team> {
        &self.team
    }

    pub fn set_age(&mut self, age: i32) {
        self.age = age;
    }

    /// Moves the member to `team`. Takes effect in the store on the next
    /// `persist`.
    pub fn change_team(&mut self, team: &Team) {
        self.team = match team.id() {
            Some(id) => Association::Reference(id),
            None => Association::Loaded(Box::new(team.clone())),
        };
    }
}

impl Entity for Member {
    type Table = MemberTable;

    const TABLE: &'static str = "member";

    const ID_COLUMN: &'static str = "member_id";

    const COLUMNS: &'static [&'static str] = &["username", "age", "team_id"];

    const DDL: &'static str = "CREATE TABLE IF NOT EXISTS member (\
        member_id INTEGER PRIMARY KEY AUTOINCREMENT, \
        username TEXT, \
        age INTEGER NOT NULL, \
        team_id INTEGER REFERENCES team(team_id))";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn assign_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::from(self.username.clone()),
            Value::from(self.age),
            Value::from(self.team.id()),
        ]
    }

    fn unsaved_reference(&self) -> Option<&'static str> {
        (self.team.is_loaded() && self.team.id().is_none()).then_some("team")
    }
}

/// Query handle of the `member` table.
///
/// Selecting the handle itself decodes whole [`Member`] rows. After
/// `fetch_join` on `member.team()` the team columns are selected too and
/// [`Member::team`] comes back [`Association::Loaded`].
#[derive(Debug, Clone, Copy)]
pub struct MemberTable {
    alias: &'static str,
    pub id: Column<BigInt, NonNull>,
    pub username: Column<Text, Null>,
    pub age: Column<Int, NonNull>,
    pub team_id: Column<BigInt, Null>,
    fetch_team: Option<&'static str>,
}

impl MemberTable {
    pub const fn new() -> Self {
        Self::aliased(Member::TABLE)
    }

    pub const fn aliased(alias: &'static str) -> Self {
        Self {
            alias,
            id: Column::new(alias, "member_id"),
            username: Column::new(alias, "username"),
            age: Column::new(alias, "age"),
            team_id: Column::new(alias, "team_id"),
            fetch_team: None,
        }
    }

    /// The many-to-one `team` relationship.
    pub const fn team(&self) -> RelationPath<TeamTable> {
        RelationPath::new(
            self.alias,
            "team",
            Link::ManyToOne {
                fk: "team_id",
                pk: "team_id",
            },
        )
    }
}

impl Default for MemberTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Table for MemberTable {
    const NAME: &'static str = Member::TABLE;

    fn alias(&self) -> &'static str {
        self.alias
    }
}

impl Projection for MemberTable {
    type Output = Member;

    fn selections(&self) -> Vec<Selection> {
        let mut selections = vec![
            Selection::of(&self.id),
            Selection::of(&self.username),
            Selection::of(&self.age),
            Selection::of(&self.team_id),
        ];
        if let Some(alias) = self.fetch_team {
            selections.extend(TeamTable::aliased(alias).selections());
        }
        selections
    }

    fn decode(&self, row: &mut RowReader) -> Result<Member, QueryError> {
        let id: i64 = row.read()?;
        let username: Option<String> = row.read()?;
        let age: i32 = row.read()?;
        let team_id: Option<i64> = row.read()?;

        // A left join leaves the fetched team columns null.
        let fetched = match self.fetch_team {
            Some(alias) => optional(TeamTable::aliased(alias)).decode(row)?,
            None => None,
        };
        let team = match (fetched, team_id) {
            (Some(team), _) => Association::Loaded(Box::new(team)),
            (None, Some(id)) => Association::Reference(id),
            (None, None) => Association::Unassigned,
        };

        Ok(Member {
            id: Some(id),
            username,
            age,
            team,
        })
    }

    fn attach_fetch(&mut self, join: &FetchJoin) -> Result<(), BuildError> {
        if join.owner == self.alias && join.relation == "team" {
            self.fetch_team = Some(join.target);
            Ok(())
        } else {
            Err(BuildError::FetchJoinTarget { alias: join.target })
        }
    }
}

impl EntityTable for MemberTable {
    type Entity = Member;

    fn id_column(&self) -> Column<BigInt, NonNull> {
        self.id
    }
}
