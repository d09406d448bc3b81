//! A unit of work over a SQLite connection.
//!
//! [`Session`] pairs a [`Store`] (the connection) with an [`IdentityMap`]
//! of entities it has loaded or persisted. Queries run against either:
//!
//! ```no_run
//! use teamql::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let session = Session::open_in_memory()?;
//! session.create_schema()?;
//!
//! let member = MemberTable::new();
//! let adults = select_from(member)
//!     .r#where(gte(member.age, 18))
//!     .fetch(&session)?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use rusqlite::{Connection, params_from_iter};
use teamql_core::error::{QueryError, Stage, StoreError};
use teamql_core::expr::eq;
use teamql_core::query::{Mutation, Stale, select_from};
use teamql_core::{
    Entity, EntityTable, Executor, IdentityMap, SQL, Statement, Token, Value, teamql_trace_query,
};
use thiserror::Error;

use crate::config::{Database, SessionConfig};

#[derive(Debug, Error)]
pub enum SessionError {
    /// The database could not be opened or configured
    #[error("failed to open database: {0}")]
    Open(#[source] rusqlite::Error),

    #[error(transparent)]
    Query(#[from] QueryError),
}

/// A rusqlite connection that runs rendered statements.
#[derive(Debug)]
pub struct Store {
    conn: Connection,
    log_statements: bool,
}

impl Store {
    pub fn open(config: &SessionConfig) -> Result<Self, SessionError> {
        let conn = match &config.database {
            Database::Memory => Connection::open_in_memory(),
            Database::File { path } => Connection::open(path),
        }
        .map_err(SessionError::Open)?;

        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))
            .map_err(SessionError::Open)?;
        conn.pragma_update(None, "foreign_keys", config.foreign_keys)
            .map_err(SessionError::Open)?;

        Ok(Self {
            conn,
            log_statements: config.log_statements,
        })
    }

    /// Underlying connection, for statements outside the query layer.
    #[inline]
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    fn trace(&self, statement: &Statement) {
        if self.log_statements {
            teamql_trace_query!(statement.sql, statement.params.len());
        }
    }
}

impl Executor for Store {
    fn query(&self, statement: &Statement) -> Result<Vec<Vec<Value>>, StoreError> {
        self.trace(statement);
        let mut stmt = self.conn.prepare(&statement.sql)?;
        let width = stmt.column_count();
        let mut rows = stmt.query(params_from_iter(statement.params.iter()))?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(width);
            for i in 0..width {
                values.push(Value::try_from(row.get_ref(i)?)?);
            }
            out.push(values);
        }
        Ok(out)
    }

    fn execute(&self, statement: &Statement) -> Result<u64, StoreError> {
        self.trace(statement);
        let affected = self
            .conn
            .execute(&statement.sql, params_from_iter(statement.params.iter()))?;
        Ok(affected as u64)
    }
}

/// A store connection plus the entities loaded through it.
#[derive(Debug)]
pub struct Session {
    store: Store,
    cache: IdentityMap,
}

impl Session {
    pub fn open(config: &SessionConfig) -> Result<Self, SessionError> {
        Ok(Self {
            store: Store::open(config)?,
            cache: IdentityMap::new(),
        })
    }

    pub fn open_in_memory() -> Result<Self, SessionError> {
        Self::open(&SessionConfig::in_memory())
    }

    /// Creates the `team` and `member` tables if they do not exist.
    pub fn create_schema(&self) -> Result<(), QueryError> {
        let ddl = format!("{};\n{};", crate::Team::DDL, crate::Member::DDL);
        self.store
            .conn
            .execute_batch(&ddl)
            .map_err(|e| QueryError::store(Stage::Schema, ddl, e))
    }

    #[inline]
    pub fn store(&self) -> &Store {
        &self.store
    }

    #[inline]
    pub fn cache(&self) -> &IdentityMap {
        &self.cache
    }

    /// Detaches every cached entity.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Inserts a new entity or updates a persisted one, and caches it.
    ///
    /// New entities are assigned the generated id. Related entities are not
    /// persisted along with it; referring to one that has no id yet is an
    /// error.
    pub fn persist<E: Entity>(&mut self, entity: &mut E) -> Result<(), QueryError> {
        if let Some(relation) = entity.unsaved_reference() {
            return Err(QueryError::UnsavedReference {
                entity: E::TABLE,
                relation,
            });
        }
        match entity.id() {
            Some(id) => {
                let assignments = E::COLUMNS.iter().zip(entity.values()).map(|(column, value)| {
                    SQL::ident(*column).push(Token::EQ).append(SQL::param(value))
                });
                let sql = SQL::token(Token::UPDATE)
                    .append(SQL::ident(E::TABLE))
                    .push(Token::SET)
                    .append(SQL::join(assignments, Token::COMMA))
                    .push(Token::WHERE)
                    .append(by_id::<E>(id));
                self.run(&sql)?;
            }
            None => {
                let columns = E::COLUMNS.iter().map(|column| SQL::ident(*column));
                let values = entity.values().into_iter().map(SQL::param);
                let sql = SQL::token(Token::INSERT)
                    .push(Token::INTO)
                    .append(SQL::ident(E::TABLE))
                    .append(SQL::join(columns, Token::COMMA).parens())
                    .push(Token::VALUES)
                    .append(SQL::join(values, Token::COMMA).parens());
                self.run(&sql)?;
                entity.assign_id(self.store.conn.last_insert_rowid());
            }
        }
        self.cache.insert(entity.clone());
        Ok(())
    }

    /// Loads an entity by id, from the cache when it is already there.
    pub fn find<E: Entity>(&mut self, id: i64) -> Result<Option<E>, QueryError> {
        if let Some(entity) = self.cache.get::<E>(id) {
            return Ok(Some(entity.clone()));
        }
        let table = E::Table::default();
        let found = select_from(table)
            .r#where(eq(table.id_column(), id))
            .fetch_one(&self.store)?;
        if let Some(entity) = &found {
            self.cache.insert(entity.clone());
        }
        Ok(found)
    }

    /// Deletes a persisted entity. Returns whether a row was removed.
    pub fn remove<E: Entity>(&mut self, entity: &E) -> Result<bool, QueryError> {
        let Some(id) = entity.id() else {
            return Ok(false);
        };
        let sql = SQL::token(Token::DELETE)
            .push(Token::FROM)
            .append(SQL::ident(E::TABLE))
            .push(Token::WHERE)
            .append(by_id::<E>(id));
        let affected = self.run(&sql)?;
        self.cache.evict::<E>(id);
        Ok(affected > 0)
    }

    /// Runs a bulk update or delete. The returned token decides what
    /// happens to the entities this session cached for the table.
    pub fn bulk<M: Mutation>(&mut self, mutation: &M) -> Result<Stale<'_>, QueryError> {
        mutation.execute(&self.store, &mut self.cache)
    }

    fn run(&self, sql: &SQL) -> Result<u64, QueryError> {
        let statement = Statement::from(sql);
        self.store
            .execute(&statement)
            .map_err(|source| QueryError::store(Stage::Persist, statement.sql, source))
    }
}

impl Executor for Session {
    fn query(&self, statement: &Statement) -> Result<Vec<Vec<Value>>, StoreError> {
        self.store.query(statement)
    }

    fn execute(&self, statement: &Statement) -> Result<u64, StoreError> {
        self.store.execute(statement)
    }
}

fn by_id<E: Entity>(id: i64) -> SQL {
    SQL::ident(E::ID_COLUMN)
        .push(Token::EQ)
        .append(SQL::param(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Member, Team};

    fn session() -> Session {
        let session = Session::open_in_memory().unwrap();
        session.create_schema().unwrap();
        session
    }

    #[test]
    fn persist_assigns_ids() {
        let mut session = session();
        let mut team = Team::new("teamA");
        session.persist(&mut team).unwrap();
        assert!(team.id().is_some());

        let mut member = Member::with_team("member1", 10, &team);
        session.persist(&mut member).unwrap();
        assert_eq!(member.team().id(), team.id());
    }

    #[test]
    fn find_prefers_the_cache() {
        let mut session = session();
        let mut member = Member::new("member1", 10);
        session.persist(&mut member).unwrap();
        let id = member.id().unwrap();

        session
            .store()
            .conn()
            .execute("UPDATE member SET age = 99", [])
            .unwrap();
        assert_eq!(session.find::<Member>(id).unwrap().unwrap().age(), 10);

        session.clear();
        assert_eq!(session.find::<Member>(id).unwrap().unwrap().age(), 99);
    }

    #[test]
    fn remove_deletes_and_evicts() {
        let mut session = session();
        let mut member = Member::new("member1", 10);
        session.persist(&mut member).unwrap();

        assert!(session.remove(&member).unwrap());
        assert!(session.cache().is_empty());
        assert!(session.find::<Member>(member.id().unwrap()).unwrap().is_none());
    }

    #[test]
    fn persisted_updates_are_written() {
        let mut session = session();
        let mut member = Member::new("member1", 10);
        session.persist(&mut member).unwrap();
        member.set_age(11);
        session.persist(&mut member).unwrap();

        session.clear();
        let found: Member = session.find(member.id().unwrap()).unwrap().unwrap();
        assert_eq!(found.age(), 11);
    }

    #[test]
    fn members_of_unsaved_teams_are_not_written() {
        let mut session = session();
        let mut team = Team::new("teamA");
        let mut member = Member::with_team("member1", 10, &team);

        let err = session.persist(&mut member).unwrap_err();
        assert!(matches!(
            err,
            QueryError::UnsavedReference {
                entity: "member",
                relation: "team"
            }
        ));
        assert_eq!(member.id(), None);
        assert!(session.cache().is_empty());

        session.persist(&mut team).unwrap();
        member.change_team(&team);
        session.persist(&mut member).unwrap();
        session.clear();
        let found: Member = session.find(member.id().unwrap()).unwrap().unwrap();
        assert_eq!(found.team().id(), team.id());
    }

    #[test]
    fn unnamed_teams_round_trip() {
        let mut session = session();
        let mut team = Team::default();
        session.persist(&mut team).unwrap();

        session.clear();
        let found: Team = session.find(team.id().unwrap()).unwrap().unwrap();
        assert_eq!(found.name(), None);
    }
}
