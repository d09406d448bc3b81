use crate::conversions::ToSQL;
use crate::expr::Expr;
use crate::schema::OrderBy;
use crate::sql::{SQL, Token};

/// Where NULL keys sort relative to the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullsOrder {
    First,
    Last,
}

/// One key of an ORDER BY clause.
#[derive(Debug, Clone)]
pub struct OrderSpecifier {
    expr: SQL,
    direction: OrderBy,
    nulls: Option<NullsOrder>,
}

impl OrderSpecifier {
    pub fn new<E: Expr>(expr: E, direction: OrderBy) -> Self {
        Self {
            expr: expr.into_sql(),
            direction,
            nulls: None,
        }
    }

    pub fn nulls_first(mut self) -> Self {
        self.nulls = Some(NullsOrder::First);
        self
    }

    pub fn nulls_last(mut self) -> Self {
        self.nulls = Some(NullsOrder::Last);
        self
    }

    #[inline]
    pub fn direction(&self) -> OrderBy {
        self.direction
    }

    pub(crate) fn expr(&self) -> &SQL {
        &self.expr
    }
}

impl ToSQL for OrderSpecifier {
    fn to_sql(&self) -> SQL {
        let sql = self.expr.clone().push(self.direction.token());
        match self.nulls {
            Some(NullsOrder::First) => sql.push(Token::NULLS).push(Token::FIRST),
            Some(NullsOrder::Last) => sql.push(Token::NULLS).push(Token::LAST),
            None => sql,
        }
    }
}

/// Ascending order on `expr`.
pub fn asc<E: Expr>(expr: E) -> OrderSpecifier {
    OrderSpecifier::new(expr, OrderBy::Asc)
}

/// Descending order on `expr`.
pub fn desc<E: Expr>(expr: E) -> OrderSpecifier {
    OrderSpecifier::new(expr, OrderBy::Desc)
}

/// One or more order keys, appended in sequence.
pub trait IntoOrderSpecifiers {
    fn into_specifiers(self) -> Vec<OrderSpecifier>;
}

impl IntoOrderSpecifiers for OrderSpecifier {
    fn into_specifiers(self) -> Vec<OrderSpecifier> {
        vec![self]
    }
}

impl IntoOrderSpecifiers for Vec<OrderSpecifier> {
    fn into_specifiers(self) -> Vec<OrderSpecifier> {
        self
    }
}

impl<const K: usize> IntoOrderSpecifiers for [OrderSpecifier; K] {
    fn into_specifiers(self) -> Vec<OrderSpecifier> {
        self.into()
    }
}

macro_rules! impl_tuple_order {
    (@specifier $name:ident) => { OrderSpecifier };
    ($($name:ident),+) => {
        impl IntoOrderSpecifiers for ($(impl_tuple_order!(@specifier $name),)+) {
            #[allow(non_snake_case)]
            fn into_specifiers(self) -> Vec<OrderSpecifier> {
                let ($($name,)+) = self;
                vec![$($name),+]
            }
        }
    };
}

impl_tuple_order!(A, B);
impl_tuple_order!(A, B, C);
impl_tuple_order!(A, B, C, D);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{NonNull, Null};
    use crate::schema::Column;
    use crate::types::{Int, Text};

    #[test]
    fn null_placement_is_rendered() {
        let age: Column<Int, NonNull> = Column::new("member", "age");
        let username: Column<Text, Null> = Column::new("member", "username");

        assert_eq!(desc(age).to_sql().sql(), r#""member"."age" DESC"#);
        assert_eq!(
            asc(username).nulls_last().to_sql().sql(),
            r#""member"."username" ASC NULLS LAST"#
        );
    }
}
