mod chunk;
mod tokens;

use std::borrow::Cow;
use std::fmt::{self, Display, Write};

pub use chunk::*;
use smallvec::SmallVec;
pub use tokens::*;

use crate::conversions::ToSQL;
use crate::value::Value;

/// SQL fragment builder with flat chunk storage.
///
/// Uses `SmallVec<[SQLChunk; 8]>` for inline storage of typical SQL fragments
/// without heap allocation.
#[derive(Debug, Clone, Default)]
pub struct SQL {
    pub chunks: SmallVec<[SQLChunk; 8]>,
}

impl SQL {
    // ==================== constructors ====================

    /// Creates an empty SQL fragment
    #[inline]
    pub const fn empty() -> Self {
        Self {
            chunks: SmallVec::new_const(),
        }
    }

    /// Creates SQL with a single token
    #[inline]
    pub fn token(t: Token) -> Self {
        Self {
            chunks: smallvec::smallvec![SQLChunk::Token(t)],
        }
    }

    /// Creates SQL with a quoted identifier
    #[inline]
    pub fn ident(name: impl Into<Cow<'static, str>>) -> Self {
        SQL::from_chunk(SQLChunk::Ident(name.into()))
    }

    /// Creates SQL with raw text
    #[inline]
    pub fn raw(text: impl Into<Cow<'static, str>>) -> Self {
        SQL::from_chunk(SQLChunk::Raw(text.into()))
    }

    /// Creates SQL with an inline integer literal
    #[inline]
    pub fn number(value: i64) -> Self {
        SQL::from_chunk(SQLChunk::Number(value))
    }

    /// Creates SQL with a bound parameter
    #[inline]
    pub fn param(value: impl Into<Value>) -> Self {
        SQL::from_chunk(SQLChunk::Param(value.into()))
    }

    /// Creates SQL referencing a table under an alias
    #[inline]
    pub fn table(name: &'static str, alias: &'static str) -> Self {
        SQL::from_chunk(SQLChunk::Table { name, alias })
    }

    /// Creates SQL referencing a qualified column
    #[inline]
    pub fn column(source: &'static str, name: &'static str) -> Self {
        SQL::from_chunk(SQLChunk::Column { source, name })
    }

    /// Wraps a complete SELECT as a nested query
    #[inline]
    pub fn subquery(sql: SQL, aliases: Vec<&'static str>) -> Self {
        SQL::from_chunk(SQLChunk::Subquery {
            sql: Box::new(sql),
            aliases,
        })
    }

    #[inline]
    fn from_chunk(chunk: SQLChunk) -> Self {
        Self {
            chunks: smallvec::smallvec![chunk],
        }
    }

    /// Function call: NAME(args)
    #[inline]
    pub fn func(name: &'static str, args: SQL) -> Self {
        SQL::raw(name)
            .push(Token::LPAREN)
            .append(args)
            .push(Token::RPAREN)
    }

    // ==================== builder methods ====================

    /// Append another SQL fragment (flat extend)
    #[inline]
    pub fn append(mut self, other: impl Into<SQL>) -> Self {
        self.append_mut(other);
        self
    }

    #[inline]
    pub fn append_mut(&mut self, other: impl Into<SQL>) {
        let other = other.into();
        if self.chunks.is_empty() {
            self.chunks = other.chunks;
        } else {
            self.chunks.extend(other.chunks);
        }
    }

    /// Push a single chunk
    #[inline]
    pub fn push(mut self, chunk: impl Into<SQLChunk>) -> Self {
        self.chunks.push(chunk.into());
        self
    }

    #[inline]
    pub fn push_mut(&mut self, chunk: impl Into<SQLChunk>) {
        self.chunks.push(chunk.into());
    }

    // ==================== combinators ====================

    /// Joins multiple SQL fragments with a separator
    pub fn join<T>(sqls: T, separator: Token) -> SQL
    where
        T: IntoIterator,
        T::Item: ToSQL,
    {
        let mut iter = sqls.into_iter();
        let Some(first) = iter.next() else {
            return SQL::empty();
        };

        let mut result = first.into_sql();
        for item in iter {
            result.chunks.push(SQLChunk::Token(separator));
            result.chunks.extend(item.into_sql().chunks);
        }
        result
    }

    /// Wrap in parentheses: (self)
    #[inline]
    pub fn parens(self) -> Self {
        SQL::token(Token::LPAREN).append(self).push(Token::RPAREN)
    }

    /// Creates an aliased version: self AS "name"
    pub fn alias(self, name: impl Into<Cow<'static, str>>) -> SQL {
        self.push(Token::AS).push(SQLChunk::Ident(name.into()))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    // ==================== scope inspection ====================

    /// Sources referenced by columns of this fragment, excluding nested queries.
    pub fn column_sources(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.chunks.iter().filter_map(|chunk| match chunk {
            SQLChunk::Column { source, .. } => Some(*source),
            _ => None,
        })
    }

    /// Whether the fragment stays non-null when its columns are NULL:
    /// `COUNT(..)`, `COALESCE(..)` and `.. IS [NOT] NULL`.
    pub fn absorbs_null(&self) -> bool {
        match self.chunks.as_slice() {
            [SQLChunk::Raw(name), SQLChunk::Token(Token::LPAREN), ..] => {
                matches!(name.as_ref(), "COUNT" | "COALESCE")
            }
            [.., SQLChunk::Token(Token::IS), SQLChunk::Token(Token::NULL)]
            | [.., SQLChunk::Token(Token::IS), SQLChunk::Token(Token::NOT), SQLChunk::Token(Token::NULL)] => true,
            _ => false,
        }
    }

    /// Nested queries directly contained in this fragment.
    pub fn subqueries(&self) -> impl Iterator<Item = (&SQL, &[&'static str])> + '_ {
        self.chunks.iter().filter_map(|chunk| match chunk {
            SQLChunk::Subquery { sql, aliases } => Some((sql.as_ref(), aliases.as_slice())),
            _ => None,
        })
    }

    // ==================== rendering ====================

    /// Returns the SQL string with `?` placeholders.
    pub fn sql(&self) -> String {
        let mut buf = String::with_capacity(self.chunks.len().saturating_mul(8).max(64));
        self.write_with(&mut buf, &mut |buf, _| buf.push('?'));
        buf
    }

    /// Generates the SQL string and collects parameters in a single pass.
    pub fn build(&self) -> (String, Vec<Value>) {
        let mut buf = String::with_capacity(self.chunks.len().saturating_mul(8).max(64));
        let mut params = Vec::new();
        self.write_with(&mut buf, &mut |buf, value| {
            buf.push('?');
            params.push(value.clone());
        });
        (buf, params)
    }

    /// Renders with parameters inlined.
    ///
    /// Two fragments with equal fingerprints select the same thing, which is
    /// what raw tuple rows are keyed on.
    pub fn fingerprint(&self) -> String {
        let mut buf = String::with_capacity(self.chunks.len().saturating_mul(8).max(64));
        self.write_with(&mut buf, &mut |buf, value| {
            let _ = write!(buf, "{value}");
        });
        buf
    }

    pub(crate) fn write_with(
        &self,
        buf: &mut String,
        on_param: &mut impl FnMut(&mut String, &Value),
    ) {
        for (i, chunk) in self.chunks.iter().enumerate() {
            chunk.write(buf, on_param);
            if let Some(next) = self.chunks.get(i + 1)
                && chunk_needs_space(chunk, next)
            {
                buf.push(' ');
            }
        }
    }
}

/// Canonical spacing logic for SQL chunk rendering.
pub(crate) fn chunk_needs_space(current: &SQLChunk, next: &SQLChunk) -> bool {
    // Raw text controls its own spacing at the edges
    if let SQLChunk::Raw(text) = current
        && (text.ends_with(' ') || text.ends_with('('))
    {
        return false;
    }
    if let SQLChunk::Raw(text) = next
        && (text.starts_with(' ') || text.starts_with(',') || text.starts_with(')'))
    {
        return false;
    }

    match (current, next) {
        // No space before closing/separator punctuation
        (_, SQLChunk::Token(Token::RPAREN | Token::COMMA | Token::DOT)) => false,
        // No space after opening punctuation
        (SQLChunk::Token(Token::LPAREN | Token::DOT), _) => false,
        // Space after comma
        (SQLChunk::Token(Token::COMMA), _) => true,
        // Space around comparison/arithmetic operators, parens included
        (SQLChunk::Token(t), _) if t.is_operator() => true,
        (_, SQLChunk::Token(t)) if t.is_operator() => true,
        // Space after closing paren if next is word-like (e.g., ") FROM")
        (SQLChunk::Token(Token::RPAREN), next) => next.is_word_like(),
        // Function call: NAME(
        (SQLChunk::Raw(_), SQLChunk::Token(Token::LPAREN)) => false,
        // Space before opening paren if preceded by word-like (e.g., "IN (")
        (current, SQLChunk::Token(Token::LPAREN)) => current.is_word_like(),
        // Space between all word-like chunks
        _ => current.is_word_like() && next.is_word_like(),
    }
}

// ==================== trait implementations ====================

impl From<Token> for SQL {
    fn from(value: Token) -> Self {
        SQL::token(value)
    }
}

impl From<SQLChunk> for SQL {
    fn from(value: SQLChunk) -> Self {
        SQL::from_chunk(value)
    }
}

impl Display for SQL {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (sql, params) = self.build();
        write!(f, r#"sql: "{sql}", params: {params:?}"#)
    }
}

impl ToSQL for SQL {
    fn to_sql(&self) -> SQL {
        self.clone()
    }

    fn into_sql(self) -> SQL {
        self
    }
}

impl FromIterator<SQLChunk> for SQL {
    fn from_iter<I: IntoIterator<Item = SQLChunk>>(iter: I) -> Self {
        Self {
            chunks: SmallVec::from_iter(iter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_calls_hug_their_parens() {
        let sql = SQL::func("COUNT", SQL::token(Token::STAR));
        assert_eq!(sql.sql(), "COUNT(*)");
    }

    #[test]
    fn operators_and_keywords_are_spaced() {
        let sql = SQL::column("member", "age")
            .push(Token::IN)
            .append(
                SQL::join([SQL::param(10), SQL::param(20)], Token::COMMA).parens(),
            );
        assert_eq!(sql.sql(), r#""member"."age" IN (?, ?)"#);

        let sql = SQL::column("member", "age").push(Token::GE).append(SQL::param(10));
        assert_eq!(sql.sql(), r#""member"."age" >= ?"#);
    }

    #[test]
    fn operators_next_to_parens_are_spaced() {
        let sql = SQL::ident("age")
            .push(Token::EQ)
            .append(
                SQL::column("member", "age")
                    .push(Token::PLUS)
                    .append(SQL::param(1))
                    .parens(),
            );
        assert_eq!(sql.sql(), r#""age" = ("member"."age" + ?)"#);

        let sql = SQL::func("COUNT", SQL::token(Token::STAR))
            .push(Token::GT)
            .append(SQL::param(1));
        assert_eq!(sql.sql(), "COUNT(*) > ?");
    }

    #[test]
    fn aliased_tables_render_as() {
        assert_eq!(SQL::table("member", "member").sql(), r#""member""#);
        assert_eq!(
            SQL::table("member", "memberSub").sql(),
            r#""member" AS "memberSub""#
        );
    }

    #[test]
    fn subquery_params_follow_chunk_order() {
        let inner = SQL::token(Token::SELECT)
            .append(SQL::param(2))
            .push(Token::FROM)
            .append(SQL::table("team", "team"));
        let sql = SQL::param(1)
            .push(Token::EQ)
            .append(SQL::subquery(inner, vec!["team"]))
            .push(Token::AND)
            .append(SQL::param(3));

        let (text, params) = sql.build();
        assert_eq!(text, r#"? = (SELECT ? FROM "team") AND ?"#);
        assert_eq!(
            params,
            vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]
        );
    }

    #[test]
    fn fingerprints_inline_params() {
        let sql = SQL::column("member", "username")
            .push(Token::CONCAT)
            .append(SQL::param("_"));
        assert_eq!(sql.fingerprint(), r#""member"."username" || '_'"#);
    }

    #[test]
    fn column_sources_skip_nested_queries() {
        let inner = SQL::column("memberSub", "age");
        let sql = SQL::column("member", "age")
            .push(Token::EQ)
            .append(SQL::subquery(inner, vec!["memberSub"]));
        assert_eq!(sql.column_sources().collect::<Vec<_>>(), vec!["member"]);
        assert_eq!(sql.subqueries().count(), 1);
    }
}
