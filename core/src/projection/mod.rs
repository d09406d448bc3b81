//! Mapping result rows into Rust values.
//!
//! A [`Projection`] is both the select list of a query and the decoder for its
//! rows. Shapes, from most to least statically checked:
//!
//! - single expressions and tuples of projections decode into typed tuples
//! - [`DeclaredProjection`]: a typed constructor declared once on the target
//! - [`Projections::constructor`]: any `T: From<(..)>` matching the selected types
//! - [`Projections::bean`] / [`Projections::fields`]: named slots written through
//!   setters or fields, with names and kinds checked when the projection is built
//! - [`TupleProjection`]: raw rows keyed by the originating expression

mod bean;
mod constructor;
mod tuple;

pub use bean::*;
pub use constructor::*;
pub use tuple::*;

use crate::error::{BuildError, QueryError};
use crate::expr::{Aliased, Expr, ExprOutput, Nullability, SQLExpr, Selectable};
use crate::row::RowReader;
use crate::schema::Column;
use crate::sql::SQL;
use crate::types::DataType;
use crate::value::SqlKind;

/// One item of a select list.
#[derive(Debug, Clone)]
pub struct Selection {
    sql: SQL,
    natural: Option<&'static str>,
    alias: Option<&'static str>,
    kind: SqlKind,
    nullable: bool,
}

impl Selection {
    pub fn of<E: Expr>(expr: &E) -> Self {
        Self {
            sql: expr.to_sql(),
            natural: expr.natural_name(),
            alias: None,
            kind: <E::SQLType as DataType>::KIND,
            nullable: <E::Nullable as Nullability>::NULLABLE,
        }
    }

    pub fn with_alias(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }

    /// Marks the column as decoded by something that accepts NULL.
    pub fn or_null(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// The name a projection slot is matched against: the alias if any,
    /// otherwise the natural name of the expression.
    #[inline]
    pub fn name(&self) -> Option<&'static str> {
        self.alias.or(self.natural)
    }

    #[inline]
    pub fn alias(&self) -> Option<&'static str> {
        self.alias
    }

    #[inline]
    pub fn natural_name(&self) -> Option<&'static str> {
        self.natural
    }

    #[inline]
    pub fn kind(&self) -> SqlKind {
        self.kind
    }

    /// Whether a NULL in this column decodes without error.
    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    #[inline]
    pub fn sql(&self) -> &SQL {
        &self.sql
    }

    /// The expression without its alias.
    pub fn into_sql(self) -> SQL {
        self.sql
    }

    /// The select-list item: `expr` or `expr AS "alias"`.
    pub fn render(&self) -> SQL {
        match self.alias {
            Some(alias) => self.sql.clone().alias(alias),
            None => self.sql.clone(),
        }
    }

    /// Human-readable form for error messages.
    pub fn describe(&self) -> String {
        self.sql.fingerprint()
    }
}

/// An eager-fetch request passed to a projection by `fetch_join`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchJoin {
    /// Alias of the side that owns the relationship.
    pub owner: &'static str,
    /// Property name of the relationship on the owner.
    pub relation: &'static str,
    /// Alias the target was joined under.
    pub target: &'static str,
}

/// The shape rows of a query are decoded into.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be selected",
    label = "select columns, expressions, tables, tuples of those, or a projection from `Projections`"
)]
pub trait Projection: Clone {
    type Output;

    /// The select list, in decode order.
    fn selections(&self) -> Vec<Selection>;

    /// Decodes one row, reading exactly as many columns as `selections` lists.
    fn decode(&self, row: &mut RowReader) -> Result<Self::Output, QueryError>;

    /// Asks the projection to also load an association through `join`.
    fn attach_fetch(&mut self, join: &FetchJoin) -> Result<(), BuildError> {
        Err(BuildError::FetchJoinTarget { alias: join.target })
    }
}

impl<T: DataType, N: Nullability> Projection for Column<T, N> {
    type Output = ExprOutput<Self>;

    fn selections(&self) -> Vec<Selection> {
        vec![Selection::of(self)]
    }

    fn decode(&self, row: &mut RowReader) -> Result<Self::Output, QueryError> {
        row.read()
    }
}

impl<T: DataType, N: Nullability> Projection for SQLExpr<T, N> {
    type Output = ExprOutput<Self>;

    fn selections(&self) -> Vec<Selection> {
        vec![Selection::of(self)]
    }

    fn decode(&self, row: &mut RowReader) -> Result<Self::Output, QueryError> {
        row.read()
    }
}

impl<E: Expr + Clone> Projection for Aliased<E> {
    type Output = ExprOutput<E>;

    fn selections(&self) -> Vec<Selection> {
        vec![self.selection()]
    }

    fn decode(&self, row: &mut RowReader) -> Result<Self::Output, QueryError> {
        row.read()
    }
}

macro_rules! impl_tuple_projection {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: Projection),+> Projection for ($($name,)+) {
            type Output = ($($name::Output,)+);

            fn selections(&self) -> Vec<Selection> {
                let mut selections = Vec::new();
                $( selections.extend(self.$idx.selections()); )+
                selections
            }

            fn decode(&self, row: &mut RowReader) -> Result<Self::Output, QueryError> {
                Ok(($(self.$idx.decode(row)?,)+))
            }

            fn attach_fetch(&mut self, join: &FetchJoin) -> Result<(), BuildError> {
                $(
                    if self.$idx.attach_fetch(join).is_ok() {
                        return Ok(());
                    }
                )+
                Err(BuildError::FetchJoinTarget { alias: join.target })
            }
        }
    };
}

impl_tuple_projection!(A: 0);
impl_tuple_projection!(A: 0, B: 1);
impl_tuple_projection!(A: 0, B: 1, C: 2);
impl_tuple_projection!(A: 0, B: 1, C: 2, D: 3);
impl_tuple_projection!(A: 0, B: 1, C: 2, D: 3, E: 4);
impl_tuple_projection!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
impl_tuple_projection!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
impl_tuple_projection!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);

/// A projection that decodes to `None` when all of its columns are NULL.
///
/// Used for the nullable side of an outer join.
#[derive(Debug, Clone)]
pub struct Optional<P>(P);

pub fn optional<P: Projection>(projection: P) -> Optional<P> {
    Optional(projection)
}

impl<P: Projection> Projection for Optional<P> {
    type Output = Option<P::Output>;

    fn selections(&self) -> Vec<Selection> {
        self.0
            .selections()
            .into_iter()
            .map(Selection::or_null)
            .collect()
    }

    fn decode(&self, row: &mut RowReader) -> Result<Self::Output, QueryError> {
        let width = self.0.selections().len();
        if row.peek(width).iter().all(|value| value.is_null()) {
            row.skip(width);
            return Ok(None);
        }
        self.0.decode(row).map(Some)
    }

    fn attach_fetch(&mut self, join: &FetchJoin) -> Result<(), BuildError> {
        self.0.attach_fetch(join)
    }
}

// =============================================================================
// Expression lists
// =============================================================================

/// A fixed-arity list of selectable expressions with a statically known
/// decoded tuple type.
pub trait ExprList: Clone {
    type Decoded;

    fn selections(&self) -> Vec<Selection>;

    fn decode(row: &mut RowReader) -> Result<Self::Decoded, QueryError>;
}

macro_rules! impl_expr_list {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: Selectable),+> ExprList for ($($name,)+) {
            type Decoded = ($($name::Output,)+);

            fn selections(&self) -> Vec<Selection> {
                vec![$(self.$idx.selection()),+]
            }

            fn decode(row: &mut RowReader) -> Result<Self::Decoded, QueryError> {
                Ok(($(row.read::<$name::Output>()?,)+))
            }
        }
    };
}

impl_expr_list!(A: 0);
impl_expr_list!(A: 0, B: 1);
impl_expr_list!(A: 0, B: 1, C: 2);
impl_expr_list!(A: 0, B: 1, C: 2, D: 3);
impl_expr_list!(A: 0, B: 1, C: 2, D: 3, E: 4);
impl_expr_list!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
impl_expr_list!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
impl_expr_list!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);

// A lone expression is a list of one, so `group_by(team.name)` needs no tuple.
macro_rules! impl_single_expr_list {
    ($($target:ident),+) => {
        $(
            impl<T: DataType, N: Nullability> ExprList for $target<T, N> {
                type Decoded = ExprOutput<Self>;

                fn selections(&self) -> Vec<Selection> {
                    vec![Selection::of(self)]
                }

                fn decode(row: &mut RowReader) -> Result<Self::Decoded, QueryError> {
                    row.read()
                }
            }
        )+
    };
}

impl_single_expr_list!(Column, SQLExpr);

impl<E: Expr + Clone> ExprList for Aliased<E> {
    type Decoded = ExprOutput<E>;

    fn selections(&self) -> Vec<Selection> {
        vec![self.selection()]
    }

    fn decode(row: &mut RowReader) -> Result<Self::Decoded, QueryError> {
        row.read()
    }
}

/// Entry points for the named and constructor-based projection shapes.
pub struct Projections;

impl Projections {
    /// Instantiates `T` by default and writes each column through its setter.
    pub fn bean<T: SetterTarget, L: ExprList>(exprs: L) -> Result<BeanProjection<T>, BuildError> {
        BeanProjection::new(exprs.selections())
    }

    /// Instantiates `T` by default and writes each column directly into its field.
    pub fn fields<T: FieldTarget, L: ExprList>(exprs: L) -> Result<FieldProjection<T>, BuildError> {
        FieldProjection::new(exprs.selections())
    }

    /// Passes the decoded columns positionally to `T::from`.
    ///
    /// ```compile_fail
    /// use teamql_core::projection::Projections;
    /// use teamql_core::schema::Column;
    /// use teamql_core::expr::{NonNull, Null};
    /// use teamql_core::types::{Int, Text};
    ///
    /// struct Dto { username: Option<String>, age: i32 }
    ///
    /// impl From<(Option<String>, i32)> for Dto {
    ///     fn from((username, age): (Option<String>, i32)) -> Self {
    ///         Dto { username, age }
    ///     }
    /// }
    ///
    /// let username: Column<Text, Null> = Column::new("member", "username");
    /// // Missing the age column: no `From<(Option<String>,)>` for Dto.
    /// let _ = Projections::constructor::<Dto, _>((username,));
    /// ```
    pub fn constructor<T, L>(exprs: L) -> ConstructorProjection<T, L>
    where
        L: ExprList,
        T: From<L::Decoded>,
    {
        ConstructorProjection::new(exprs)
    }
}
