/// Lexical category of a scanned token.
///
/// The grammar assigns one kind per rule; rule order (not match length)
/// decides which kind wins when several rules match at the same position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Statement verb (`search for`, `insert into`, `update`, ...)
    Keyword,

    /// Relational phrase or symbol (`equal to`, `greater than`, `>=`, `set`)
    Relation,

    /// Field name drawn from the inferred schema
    Field,

    /// `and`, `or`, `nor`
    LogicalOperator,

    /// Unsigned integer, or single- or double-quoted text
    Value,

    /// Pipeline stage keyword (`join`, `group`, `sort`, `unwind`,
    /// `project`, `limit`, `skip`)
    AggregationOperator,

    /// Accumulator keyword inside a `group` stage (`calculate`, `collect`,
    /// `list`)
    GroupOperator,

    /// Sort direction (`increasingly`, `decreasingly`)
    SortOperator,

    /// Table name drawn from the inferred schema
    TableName,

    /// Consumed and discarded, never emitted
    Whitespace,

    /// Catch-all for a single unrecognized character; discarded with a
    /// diagnostic
    Invalid,
}

/// A scanned token: its lexical kind and the matched text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            kind,
            text: text.into(),
        }
    }
}
