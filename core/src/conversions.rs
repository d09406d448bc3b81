use crate::sql::SQL;
use crate::value::Value;

/// Anything that can render itself as a SQL fragment.
pub trait ToSQL {
    fn to_sql(&self) -> SQL;

    fn into_sql(self) -> SQL
    where
        Self: Sized,
    {
        self.to_sql()
    }
}

impl<T: ToSQL> ToSQL for &T {
    fn to_sql(&self) -> SQL {
        (**self).to_sql()
    }
}

impl ToSQL for &str {
    fn to_sql(&self) -> SQL {
        SQL::param(*self)
    }
}

impl ToSQL for Value {
    fn to_sql(&self) -> SQL {
        SQL::param(self.clone())
    }

    fn into_sql(self) -> SQL {
        SQL::param(self)
    }
}

macro_rules! impl_to_sql_param {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToSQL for $ty {
                fn to_sql(&self) -> SQL {
                    SQL::param(self.clone())
                }
            }
        )*
    };
}

impl_to_sql_param!(i32, i64, f64, bool, String);
