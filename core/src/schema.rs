//! Tables, columns and relationship paths.
//!
//! A table handle is a small `Copy` value that knows its SQL name and the
//! alias it is queried under. Two handles of the same table with different
//! aliases can take part in the same statement, which is how correlated
//! subqueries over the same entity are written.

use core::marker::PhantomData;

use crate::conversions::ToSQL;
use crate::expr::{Expr, Nullability};
use crate::sql::{SQL, Token};
use crate::types::DataType;

/// A queryable table under an alias.
pub trait Table: Copy + 'static {
    /// SQL name of the table.
    const NAME: &'static str;

    /// Alias this handle is queried under. Defaults to [`Table::NAME`]
    /// for the canonical handle.
    fn alias(&self) -> &'static str;
}

/// Anything that can appear after `FROM` or `JOIN`.
pub trait Source {
    fn source_sql(&self) -> SQL;

    fn source_alias(&self) -> &'static str;
}

impl<T: Table> Source for T {
    fn source_sql(&self) -> SQL {
        SQL::table(T::NAME, self.alias())
    }

    fn source_alias(&self) -> &'static str {
        self.alias()
    }
}

/// A typed column reference: `"source"."name"`.
#[derive(Debug)]
pub struct Column<T: DataType, N: Nullability> {
    source: &'static str,
    name: &'static str,
    _ty: PhantomData<(T, N)>,
}

impl<T: DataType, N: Nullability> Column<T, N> {
    pub const fn new(source: &'static str, name: &'static str) -> Self {
        Self {
            source,
            name,
            _ty: PhantomData,
        }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn source(&self) -> &'static str {
        self.source
    }
}

impl<T: DataType, N: Nullability> Clone for Column<T, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: DataType, N: Nullability> Copy for Column<T, N> {}

impl<T: DataType, N: Nullability> ToSQL for Column<T, N> {
    fn to_sql(&self) -> SQL {
        SQL::column(self.source, self.name)
    }
}

impl<T: DataType, N: Nullability> Expr for Column<T, N> {
    type SQLType = T;
    type Nullable = N;

    fn natural_name(&self) -> Option<&'static str> {
        Some(self.name)
    }
}

// =============================================================================
// Relationships
// =============================================================================

/// Which side of a relationship holds the foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    /// The owner holds `fk`, referencing `pk` on the target.
    ManyToOne { fk: &'static str, pk: &'static str },
    /// The target holds `fk`, referencing `pk` on the owner.
    OneToMany { fk: &'static str, pk: &'static str },
}

/// A declared relationship from an owner alias to a target table `T`.
///
/// Obtained from the owner's table handle, e.g. `member.team()`.
#[derive(Debug)]
pub struct RelationPath<T: Table> {
    owner: &'static str,
    name: &'static str,
    link: Link,
    _target: PhantomData<T>,
}

impl<T: Table> Clone for RelationPath<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Table> Copy for RelationPath<T> {}

impl<T: Table> RelationPath<T> {
    pub const fn new(owner: &'static str, name: &'static str, link: Link) -> Self {
        Self {
            owner,
            name,
            link,
            _target: PhantomData,
        }
    }

    /// Alias of the owning side.
    #[inline]
    pub const fn owner(&self) -> &'static str {
        self.owner
    }

    /// Property name of the relationship on the owner.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn link(&self) -> Link {
        self.link
    }

    /// Join condition between the owner and `target`.
    pub fn condition(&self, target: &T) -> SQL {
        let (left, right) = match self.link {
            Link::ManyToOne { fk, pk } => {
                (SQL::column(self.owner, fk), SQL::column(target.alias(), pk))
            }
            Link::OneToMany { fk, pk } => {
                (SQL::column(target.alias(), fk), SQL::column(self.owner, pk))
            }
        };
        left.push(Token::EQ).append(right)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderBy {
    #[default]
    Asc,
    Desc,
}

impl OrderBy {
    pub(crate) const fn token(self) -> Token {
        match self {
            OrderBy::Asc => Token::ASC,
            OrderBy::Desc => Token::DESC,
        }
    }
}
