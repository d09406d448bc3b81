//! Composition of optional conditions.
//!
//! Filters are often optional: a search form may or may not supply a
//! username. Such filters are written as small functions returning
//! `Option<Predicate>` and combined here. Absent conditions are skipped, and
//! when nothing is present the result is `None`, which the query builder
//! renders as "no WHERE clause".
//!
//! ```ignore
//! fn username_eq(name: Option<&str>) -> Option<Predicate> {
//!     name.map(|name| eq(member.username, name))
//! }
//!
//! fn age_eq(age: Option<i32>) -> Option<Predicate> {
//!     age.map(|age| eq(member.age, age))
//! }
//!
//! select_from(member).r#where((username_eq(name), age_eq(age)))
//! ```

use crate::expr::{Nullability, Predicate, SQLExpr, not};
use crate::sql::{SQL, Token};
use crate::types::Bool;

/// Something that may or may not constrain a query.
pub trait IntoPredicate {
    fn into_predicate(self) -> Option<Predicate>;
}

impl<N: Nullability> IntoPredicate for SQLExpr<Bool, N> {
    fn into_predicate(self) -> Option<Predicate> {
        Some(self.with_nullability())
    }
}

impl<P: IntoPredicate> IntoPredicate for Option<P> {
    fn into_predicate(self) -> Option<Predicate> {
        self.and_then(IntoPredicate::into_predicate)
    }
}

impl<P: IntoPredicate> IntoPredicate for Vec<P> {
    fn into_predicate(self) -> Option<Predicate> {
        all_of(self)
    }
}

impl<P: IntoPredicate, const K: usize> IntoPredicate for [P; K] {
    fn into_predicate(self) -> Option<Predicate> {
        all_of(self)
    }
}

impl IntoPredicate for PredicateBuilder {
    fn into_predicate(self) -> Option<Predicate> {
        self.inner
    }
}

macro_rules! impl_tuple_predicate {
    ($($name:ident),+) => {
        impl<$($name: IntoPredicate),+> IntoPredicate for ($($name,)+) {
            #[allow(non_snake_case)]
            fn into_predicate(self) -> Option<Predicate> {
                let ($($name,)+) = self;
                let mut combined = None;
                $(
                    combined = combine(combined, $name.into_predicate(), Token::AND);
                )+
                combined
            }
        }
    };
}

impl_tuple_predicate!(A);
impl_tuple_predicate!(A, B);
impl_tuple_predicate!(A, B, C);
impl_tuple_predicate!(A, B, C, D);
impl_tuple_predicate!(A, B, C, D, E);
impl_tuple_predicate!(A, B, C, D, E, F);

fn combine(left: Option<Predicate>, right: Option<Predicate>, op: Token) -> Option<Predicate> {
    match (left, right) {
        (None, None) => None,
        (Some(one), None) | (None, Some(one)) => Some(one),
        (Some(left), Some(right)) => Some(SQLExpr::new(
            SQL::from(left).push(op).append(SQL::from(right)).parens(),
        )),
    }
}

/// ANDs every present condition. `None` when none is present.
pub fn all_of<I>(conditions: I) -> Option<Predicate>
where
    I: IntoIterator,
    I::Item: IntoPredicate,
{
    conditions
        .into_iter()
        .fold(None, |acc, next| combine(acc, next.into_predicate(), Token::AND))
}

/// ORs every present condition. `None` when none is present.
pub fn any_of<I>(conditions: I) -> Option<Predicate>
where
    I: IntoIterator,
    I::Item: IntoPredicate,
{
    conditions
        .into_iter()
        .fold(None, |acc, next| combine(acc, next.into_predicate(), Token::OR))
}

/// Incrementally built condition, starting out empty.
///
/// Every method accepts anything [`IntoPredicate`], so absent conditions can
/// be passed straight through.
#[derive(Debug, Clone, Default)]
pub struct PredicateBuilder {
    inner: Option<Predicate>,
}

impl PredicateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an initial condition.
    pub fn of(initial: impl IntoPredicate) -> Self {
        Self {
            inner: initial.into_predicate(),
        }
    }

    pub fn and(self, condition: impl IntoPredicate) -> Self {
        Self {
            inner: combine(self.inner, condition.into_predicate(), Token::AND),
        }
    }

    pub fn or(self, condition: impl IntoPredicate) -> Self {
        Self {
            inner: combine(self.inner, condition.into_predicate(), Token::OR),
        }
    }

    pub fn and_not(self, condition: impl IntoPredicate) -> Self {
        self.and(condition.into_predicate().map(not))
    }

    pub fn or_not(self, condition: impl IntoPredicate) -> Self {
        self.or(condition.into_predicate().map(not))
    }

    /// Whether any condition has been added.
    pub fn has_value(&self) -> bool {
        self.inner.is_some()
    }

    pub fn value(&self) -> Option<&Predicate> {
        self.inner.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversions::ToSQL;
    use crate::expr::{NonNull, Null, eq};
    use crate::schema::Column;
    use crate::types::{Int, Text};

    const USERNAME: Column<Text, Null> = Column::new("member", "username");
    const AGE: Column<Int, NonNull> = Column::new("member", "age");

    fn username_eq(name: Option<&str>) -> Option<Predicate> {
        name.map(|name| eq(USERNAME, name))
    }

    fn age_eq(age: Option<i32>) -> Option<Predicate> {
        age.map(|age| eq(AGE, age))
    }

    fn render(predicate: Option<Predicate>) -> Option<String> {
        predicate.map(|p| p.to_sql().sql())
    }

    #[test]
    fn absent_conditions_are_skipped() {
        let cases = [
            (Some("member1"), Some(10), Some(r#"("member"."username" = ? AND "member"."age" = ?)"#)),
            (Some("member1"), None, Some(r#""member"."username" = ?"#)),
            (None, Some(10), Some(r#""member"."age" = ?"#)),
            (None, None, None),
        ];
        for (name, age, expected) in cases {
            let combined = (username_eq(name), age_eq(age)).into_predicate();
            assert_eq!(render(combined), expected.map(str::to_owned));
        }
    }

    #[test]
    fn two_absent_conditions_compose() {
        let nothing: Option<Predicate> = None;
        assert!(all_of([nothing.clone(), nothing.clone()]).is_none());
        assert!(any_of(vec![nothing.clone(), nothing]).is_none());
        assert!(!PredicateBuilder::new().and(None::<Predicate>).or(None::<Predicate>).has_value());
    }

    #[test]
    fn combinator_output_feeds_another_combinator() {
        let inner = all_of([username_eq(Some("member1")), age_eq(None)]);
        let outer = any_of([inner, age_eq(Some(40))]);
        assert_eq!(
            render(outer).as_deref(),
            Some(r#"("member"."username" = ? OR "member"."age" = ?)"#)
        );
    }

    #[test]
    fn builder_mirrors_boolean_builder() {
        let builder = PredicateBuilder::new()
            .and(username_eq(Some("member1")))
            .and(age_eq(None))
            .and_not(age_eq(Some(20)));
        assert_eq!(
            render(builder.into_predicate()).as_deref(),
            Some(r#"("member"."username" = ? AND NOT ("member"."age" = ?))"#)
        );
    }
}
