/// SQL keywords, operators and punctuation.
///
/// Tokens render as fixed text; spacing between them is decided by the
/// renderer, never by the token itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::upper_case_acronyms)]
pub enum Token {
    // Statements
    SELECT,
    DISTINCT,
    FROM,
    WHERE,
    UPDATE,
    SET,
    DELETE,
    INSERT,
    INTO,
    VALUES,

    // Joins
    JOIN,
    INNER,
    LEFT,
    ON,

    // Grouping, ordering, paging
    GROUP,
    ORDER,
    BY,
    HAVING,
    ASC,
    DESC,
    NULLS,
    FIRST,
    LAST,
    LIMIT,
    OFFSET,

    // Logical
    AND,
    OR,
    NOT,

    // Predicates
    IN,
    EXISTS,
    BETWEEN,
    LIKE,
    IS,
    NULL,

    // Conditional
    CASE,
    WHEN,
    THEN,
    ELSE,
    END,

    AS,

    // Punctuation
    LPAREN,
    RPAREN,
    COMMA,
    DOT,
    STAR,

    // Operators
    EQ,
    NE,
    LT,
    GT,
    LE,
    GE,
    PLUS,
    MINUS,
    CONCAT,
}

impl Token {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Token::SELECT => "SELECT",
            Token::DISTINCT => "DISTINCT",
            Token::FROM => "FROM",
            Token::WHERE => "WHERE",
            Token::UPDATE => "UPDATE",
            Token::SET => "SET",
            Token::DELETE => "DELETE",
            Token::INSERT => "INSERT",
            Token::INTO => "INTO",
            Token::VALUES => "VALUES",
            Token::JOIN => "JOIN",
            Token::INNER => "INNER",
            Token::LEFT => "LEFT",
            Token::ON => "ON",
            Token::GROUP => "GROUP",
            Token::ORDER => "ORDER",
            Token::BY => "BY",
            Token::HAVING => "HAVING",
            Token::ASC => "ASC",
            Token::DESC => "DESC",
            Token::NULLS => "NULLS",
            Token::FIRST => "FIRST",
            Token::LAST => "LAST",
            Token::LIMIT => "LIMIT",
            Token::OFFSET => "OFFSET",
            Token::AND => "AND",
            Token::OR => "OR",
            Token::NOT => "NOT",
            Token::IN => "IN",
            Token::EXISTS => "EXISTS",
            Token::BETWEEN => "BETWEEN",
            Token::LIKE => "LIKE",
            Token::IS => "IS",
            Token::NULL => "NULL",
            Token::CASE => "CASE",
            Token::WHEN => "WHEN",
            Token::THEN => "THEN",
            Token::ELSE => "ELSE",
            Token::END => "END",
            Token::AS => "AS",
            Token::LPAREN => "(",
            Token::RPAREN => ")",
            Token::COMMA => ",",
            Token::DOT => ".",
            Token::STAR => "*",
            Token::EQ => "=",
            Token::NE => "<>",
            Token::LT => "<",
            Token::GT => ">",
            Token::LE => "<=",
            Token::GE => ">=",
            Token::PLUS => "+",
            Token::MINUS => "-",
            Token::CONCAT => "||",
        }
    }

    /// Binary operators are always surrounded by spaces.
    #[inline]
    pub const fn is_operator(&self) -> bool {
        matches!(
            self,
            Token::EQ
                | Token::NE
                | Token::LT
                | Token::GT
                | Token::LE
                | Token::GE
                | Token::PLUS
                | Token::MINUS
                | Token::CONCAT
        )
    }
}

impl core::fmt::Display for Token {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
