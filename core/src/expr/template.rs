//! Raw scalar-function templates with positional arguments.
//!
//! Store-specific functions that have no typed wrapper are written as a
//! template where `{0}`, `{1}`, ... stand for the arguments:
//!
//! ```ignore
//! let replaced = template::<Text, _>(
//!     "replace({0}, {1}, {2})",
//!     (member.username, "member", "M"),
//! )?;
//! ```

use std::borrow::Cow;

use crate::error::BuildError;
use crate::projection::ExprList;
use crate::sql::{SQL, SQLChunk};
use crate::types::DataType;

use super::{Null, SQLExpr};

/// Builds `pattern` with each `{n}` replaced by the n-th argument.
///
/// The result is typed `T` and nullable, since the function is opaque.
pub fn template<T: DataType, A: ExprList>(
    pattern: &'static str,
    args: A,
) -> Result<SQLExpr<T, Null>, BuildError> {
    let args: Vec<SQL> = args
        .selections()
        .into_iter()
        .map(|selection| selection.into_sql())
        .collect();
    let error = |reason: String| BuildError::Template { pattern, reason };

    let mut sql = SQL::empty();
    let mut rest = pattern;
    loop {
        let open = rest.find('{');
        let text = &rest[..open.unwrap_or(rest.len())];
        if text.contains('}') {
            return Err(error("unmatched `}`".into()));
        }
        if !text.is_empty() {
            sql.push_mut(SQLChunk::Raw(Cow::Borrowed(text)));
        }
        let Some(open) = open else {
            break;
        };
        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| error(format!("unterminated placeholder at byte {open}")))?;
        let index: usize = after[..close]
            .trim()
            .parse()
            .map_err(|_| error(format!("`{{{}}}` is not an argument index", &after[..close])))?;
        let arg = args.get(index).ok_or_else(|| {
            error(format!(
                "argument {index} is out of range, {} given",
                args.len()
            ))
        })?;
        sql.append_mut(arg.clone());
        rest = &after[close + 1..];
    }

    // Opaque text may hold operators of any precedence.
    Ok(SQLExpr::new(sql.parens()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversions::ToSQL;
    use crate::expr::{NonNull, Null, and, eq};
    use crate::schema::Column;
    use crate::types::{Bool, Int, Text};

    const USERNAME: Column<Text, Null> = Column::new("member", "username");

    #[test]
    fn substitutes_positional_arguments() {
        let expr = template::<Text, _>("replace({0}, {1}, {2})", (USERNAME, "member", "M")).unwrap();
        let (sql, params) = expr.to_sql().build();
        assert_eq!(sql, r#"(replace("member"."username", ?, ?))"#);
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn rejects_missing_arguments() {
        let err = template::<Text, _>("replace({0}, {1}, {3})", (USERNAME, "member", "M"))
            .unwrap_err();
        assert!(matches!(err, BuildError::Template { .. }));
    }

    #[test]
    fn rejects_unterminated_placeholders() {
        assert!(template::<Text, _>("lower({0", (USERNAME,)).is_err());
        assert!(template::<Text, _>("lower(x})", (USERNAME,)).is_err());
    }

    #[test]
    fn rejects_stray_closing_braces_anywhere() {
        let err = template::<Text, _>("a}b{0}", (USERNAME,)).unwrap_err();
        assert_eq!(
            err,
            BuildError::Template {
                pattern: "a}b{0}",
                reason: "unmatched `}`".into(),
            }
        );
    }

    #[test]
    fn output_is_grouped_when_combined() {
        let age: Column<Int, NonNull> = Column::new("member", "age");
        let either = template::<Bool, _>("{0} = {1} OR {2} > {3}", (USERNAME, "member1", age, 25))
            .unwrap();
        let both = and(either, eq(age, 10));
        assert_eq!(
            both.to_sql().sql(),
            r#"(("member"."username" = ? OR "member"."age" > ?) AND "member"."age" = ?)"#
        );
    }
}
