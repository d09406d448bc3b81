use std::borrow::Cow;
use std::fmt::Write;

use super::{SQL, Token};
use crate::value::Value;

/// A SQL chunk represents a part of an SQL statement.
///
/// - `Token` - SQL keywords and operators (SELECT, FROM, =, etc.)
/// - `Ident` - Quoted identifiers ("alias")
/// - `Raw` - Unquoted raw SQL text (function names, template text)
/// - `Number` - Inline integer literal (LIMIT/OFFSET)
/// - `Param` - Bound parameter value
/// - `Table` - Table reference with its query alias
/// - `Column` - Column reference qualified by its source alias
/// - `Subquery` - Nested SELECT together with the aliases it declares
#[derive(Debug, Clone)]
pub enum SQLChunk {
    /// SQL keywords and operators: SELECT, FROM, WHERE, =, AND, etc.
    Token(Token),

    /// Renders as: "name" (with quotes)
    Ident(Cow<'static, str>),

    /// Renders as: text (no quotes, as-is)
    Raw(Cow<'static, str>),

    /// Renders as: the integer itself
    Number(i64),

    /// Renders as: ?
    Param(Value),

    /// Renders as: "name" or "name" AS "alias"
    Table {
        name: &'static str,
        alias: &'static str,
    },

    /// Renders as: "source"."name"
    Column {
        source: &'static str,
        name: &'static str,
    },

    /// Renders as: (SELECT ...)
    ///
    /// `aliases` are the sources the nested query declares in its own scope.
    Subquery {
        sql: Box<SQL>,
        aliases: Vec<&'static str>,
    },
}

impl SQLChunk {
    /// Write chunk content to buffer. Parameters are written by `on_param`.
    pub(crate) fn write(
        &self,
        buf: &mut String,
        on_param: &mut impl FnMut(&mut String, &Value),
    ) {
        match self {
            SQLChunk::Token(token) => buf.push_str(token.as_str()),
            SQLChunk::Ident(name) => write_ident(buf, name),
            SQLChunk::Raw(text) => buf.push_str(text),
            SQLChunk::Number(n) => {
                let _ = write!(buf, "{n}");
            }
            SQLChunk::Param(value) => on_param(buf, value),
            SQLChunk::Table { name, alias } => {
                write_ident(buf, name);
                if alias != name {
                    buf.push_str(" AS ");
                    write_ident(buf, alias);
                }
            }
            SQLChunk::Column { source, name } => {
                write_ident(buf, source);
                buf.push('.');
                write_ident(buf, name);
            }
            SQLChunk::Subquery { sql, .. } => {
                buf.push('(');
                sql.write_with(buf, on_param);
                buf.push(')');
            }
        }
    }

    /// Check if this chunk is "word-like" (needs space separation from other word-like chunks)
    #[inline]
    pub(crate) const fn is_word_like(&self) -> bool {
        match self {
            SQLChunk::Token(t) => {
                !matches!(t, Token::LPAREN | Token::RPAREN | Token::COMMA | Token::DOT)
                    && !t.is_operator()
            }
            SQLChunk::Ident(_)
            | SQLChunk::Raw(_)
            | SQLChunk::Number(_)
            | SQLChunk::Param(_)
            | SQLChunk::Table { .. }
            | SQLChunk::Column { .. }
            | SQLChunk::Subquery { .. } => true,
        }
    }
}

fn write_ident(buf: &mut String, name: &str) {
    buf.push('"');
    buf.push_str(&name.replace('"', "\"\""));
    buf.push('"');
}

// ==================== From implementations ====================

impl From<Token> for SQLChunk {
    #[inline]
    fn from(value: Token) -> Self {
        Self::Token(value)
    }
}

impl From<Value> for SQLChunk {
    #[inline]
    fn from(value: Value) -> Self {
        Self::Param(value)
    }
}
