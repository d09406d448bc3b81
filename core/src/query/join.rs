//! Joins.
//!
//! Two families, each in an inner and a left flavor:
//!
//! - `inner_join` / `left_join` follow a declared relationship path from a
//!   source already in the query (`member.team()`), producing the foreign-key
//!   condition automatically
//! - `inner_join_on` / `left_join_on` join any source under an explicit
//!   condition, for joins that do not follow a relationship
//!
//! `join` and `join_on` are the inner flavors. `.on(..)` narrows the most
//! recent join and `.fetch_join()` asks the projection to populate the
//! association from the joined columns.

use paste::paste;

use crate::conversions::ToSQL;
use crate::error::BuildError;
use crate::expr::Predicate;
use crate::predicate::IntoPredicate;
use crate::projection::{FetchJoin, Projection};
use crate::schema::{RelationPath, Source, Table};
use crate::sql::{SQL, Token};

use super::{SelectQuery, Sourced, check_scope};

/// The type of JOIN operation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum JoinKind {
    #[default]
    Inner,
    Left,
}

impl JoinKind {
    fn tokens(self) -> SQL {
        match self {
            JoinKind::Inner => SQL::token(Token::INNER).push(Token::JOIN),
            JoinKind::Left => SQL::token(Token::LEFT).push(Token::JOIN),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct JoinClause {
    pub(crate) kind: JoinKind,
    pub(crate) source: SQL,
    pub(crate) alias: &'static str,
    pub(crate) on: Option<SQL>,
    pub(crate) relation: Option<FetchJoin>,
}

impl ToSQL for JoinClause {
    fn to_sql(&self) -> SQL {
        let sql = self.kind.tokens().append(self.source.clone());
        match &self.on {
            Some(on) => sql.push(Token::ON).append(on.clone()),
            None => sql,
        }
    }
}

#[doc(hidden)]
macro_rules! join_impl {
    ($kind:ident, $variant:ident) => {
        paste! {
            #[doc = "Joins `target` along a relationship path from a source already in the query."]
            pub fn [<$kind _join>]<T: Table>(
                self,
                path: RelationPath<T>,
                target: T,
            ) -> Result<Self, BuildError> {
                self.join_relation(JoinKind::$variant, path, target)
            }

            #[doc = "Joins `source` under an explicit condition."]
            pub fn [<$kind _join_on>]<Src: Source>(
                self,
                source: Src,
                condition: impl IntoPredicate,
            ) -> Result<Self, BuildError> {
                self.join_source(JoinKind::$variant, source, condition.into_predicate())
            }
        }
    };
}

impl<P: Projection> SelectQuery<P, Sourced> {
    join_impl!(inner, Inner);
    join_impl!(left, Left);

    /// Same as [`inner_join`](Self::inner_join).
    pub fn join<T: Table>(self, path: RelationPath<T>, target: T) -> Result<Self, BuildError> {
        self.inner_join(path, target)
    }

    /// Same as [`inner_join_on`](Self::inner_join_on).
    pub fn join_on<Src: Source>(
        self,
        source: Src,
        condition: impl IntoPredicate,
    ) -> Result<Self, BuildError> {
        self.inner_join_on(source, condition)
    }

    /// Adds a condition to the ON clause of the most recent join.
    ///
    /// On a left join this filters the joined side only; rows of the left
    /// side are kept either way.
    pub fn on(mut self, condition: impl IntoPredicate) -> Result<Self, BuildError> {
        let scope = self.scope();
        let join = self
            .joins
            .last_mut()
            .ok_or(BuildError::MissingJoin { operation: "on" })?;
        let Some(condition) = condition.into_predicate() else {
            return Ok(self);
        };
        let condition = SQL::from(condition);
        check_scope(&condition, &scope)?;
        join.on = Some(match join.on.take() {
            Some(existing) => existing.push(Token::AND).append(condition),
            None => condition,
        });
        Ok(self)
    }

    /// Loads the association of the most recent join into the projection.
    pub fn fetch_join(mut self) -> Result<Self, BuildError> {
        let join = self.joins.last().ok_or(BuildError::MissingJoin {
            operation: "fetch_join",
        })?;
        let relation = join
            .relation
            .ok_or(BuildError::FetchJoinTarget { alias: join.alias })?;
        self.projection.attach_fetch(&relation)?;
        Ok(self)
    }

    fn join_relation<T: Table>(
        mut self,
        kind: JoinKind,
        path: RelationPath<T>,
        target: T,
    ) -> Result<Self, BuildError> {
        let scope = self.scope();
        if !scope.contains(&path.owner()) {
            return Err(BuildError::UnjoinedSource {
                alias: path.owner(),
            });
        }
        let alias = target.alias();
        if scope.contains(&alias) {
            return Err(BuildError::DuplicateAlias { alias });
        }
        self.joins.push(JoinClause {
            kind,
            source: target.source_sql(),
            alias,
            on: Some(path.condition(&target)),
            relation: Some(FetchJoin {
                owner: path.owner(),
                relation: path.name(),
                target: alias,
            }),
        });
        Ok(self)
    }

    fn join_source<Src: Source>(
        mut self,
        kind: JoinKind,
        source: Src,
        condition: Option<Predicate>,
    ) -> Result<Self, BuildError> {
        let mut scope = self.scope();
        let alias = source.source_alias();
        if scope.contains(&alias) {
            return Err(BuildError::DuplicateAlias { alias });
        }
        scope.push(alias);
        let on = condition.map(SQL::from);
        if let Some(on) = &on {
            check_scope(on, &scope)?;
        }
        self.joins.push(JoinClause {
            kind,
            source: source.source_sql(),
            alias,
            on,
            relation: None,
        });
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{NonNull, Null, count, eq, is_null};
    use crate::projection::optional;
    use crate::query::select;
    use crate::schema::{Column, Link};
    use crate::types::Text;

    #[derive(Debug, Clone, Copy)]
    struct Member;

    impl Table for Member {
        const NAME: &'static str = "member";

        fn alias(&self) -> &'static str {
            "member"
        }
    }

    #[derive(Debug, Clone, Copy)]
    struct Team;

    impl Table for Team {
        const NAME: &'static str = "team";

        fn alias(&self) -> &'static str {
            "team"
        }
    }

    const USERNAME: Column<Text, Null> = Column::new("member", "username");
    const TEAM_NAME: Column<Text, NonNull> = Column::new("team", "name");
    const TEAM_PATH: RelationPath<Team> = RelationPath::new(
        "member",
        "team",
        Link::ManyToOne {
            fk: "team_id",
            pk: "team_id",
        },
    );

    #[test]
    fn relationship_join_with_on_filter() {
        let sql = select((USERNAME, optional(TEAM_NAME)))
            .from(Member)
            .left_join(TEAM_PATH, Team)
            .and_then(|q| q.on(eq(TEAM_NAME, "teamA")))
            .and_then(|q| q.build())
            .unwrap();
        assert_eq!(
            sql.sql(),
            r#"SELECT "member"."username", "team"."name" FROM "member" LEFT JOIN "team" ON "member"."team_id" = "team"."team_id" AND "team"."name" = ?"#
        );
    }

    #[test]
    fn left_joined_columns_must_accept_null() {
        let err = select((USERNAME, TEAM_NAME))
            .from(Member)
            .left_join(TEAM_PATH, Team)
            .and_then(|q| q.on(eq(TEAM_NAME, "teamA")))
            .and_then(|q| q.build())
            .unwrap_err();
        assert_eq!(
            err,
            BuildError::LeftJoinedSelection {
                alias: "team",
                expression: r#""team"."name""#.into(),
            }
        );

        // Inner joins and NULL-absorbing expressions are unaffected.
        assert!(select((USERNAME, TEAM_NAME))
            .from(Member)
            .join(TEAM_PATH, Team)
            .and_then(|q| q.build())
            .is_ok());
        assert!(select((USERNAME, count(TEAM_NAME), is_null(TEAM_NAME)))
            .from(Member)
            .left_join(TEAM_PATH, Team)
            .and_then(|q| q.build())
            .is_ok());
    }

    #[test]
    fn non_relationship_join() {
        let sql = select(USERNAME)
            .from(Member)
            .join_on(Team, eq(USERNAME, TEAM_NAME))
            .and_then(|q| q.build())
            .unwrap();
        assert!(sql.sql().ends_with(r#"INNER JOIN "team" ON "member"."username" = "team"."name""#));
    }

    #[test]
    fn join_scope_is_checked_at_the_call() {
        let err = select(USERNAME).from(Team).join(TEAM_PATH, Team).unwrap_err();
        assert_eq!(err, BuildError::UnjoinedSource { alias: "member" });

        let err = select(USERNAME).from(Member).join_on(Member, None::<Predicate>).unwrap_err();
        assert_eq!(err, BuildError::DuplicateAlias { alias: "member" });

        let err = select(USERNAME).from(Member).on(eq(USERNAME, "x")).unwrap_err();
        assert_eq!(err, BuildError::MissingJoin { operation: "on" });
    }

    #[test]
    fn fetch_join_needs_a_capable_projection() {
        let err = select(USERNAME)
            .from(Member)
            .join(TEAM_PATH, Team)
            .and_then(|q| q.fetch_join())
            .unwrap_err();
        assert_eq!(err, BuildError::FetchJoinTarget { alias: "team" });
    }

    #[test]
    fn explicit_join_cannot_be_fetched() {
        let err = select(USERNAME)
            .from(Member)
            .join_on(Team, None::<Predicate>)
            .and_then(|q| q.fetch_join())
            .unwrap_err();
        assert_eq!(err, BuildError::FetchJoinTarget { alias: "team" });
    }
}
