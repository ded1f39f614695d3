//! Dual-target code generation.
//!
//! Two independent renderers share one validated AST: [sql] emits SQL
//! statement text, [mongo] emits a MongoDB-style call or pipeline
//! expression. Both terminate their output with `;`.

pub mod mongo;
pub mod sql;

use crate::ast::Statement;
use crate::schema::Dialect;

/// The AST is missing a child the requested output structurally requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenError {
    /// An update without any assignment to render
    MissingSetClause,
    /// An insert without any record to render
    MissingRecords,
    /// A record without any field/value atom
    EmptyRecord,
}

impl std::fmt::Display for GenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenError::MissingSetClause => write!(f, "Update statement has no set clause"),
            GenError::MissingRecords => write!(f, "Insert statement has no records"),
            GenError::EmptyRecord => write!(f, "Insert record has no field/value pairs"),
        }
    }
}

impl std::error::Error for GenError {}

/// Render the statement for the requested dialect.
pub fn generate(statement: &Statement, dialect: Dialect) -> Result<String, GenError> {
    match dialect {
        Dialect::Relational => sql::render(statement),
        Dialect::Document => mongo::render(statement),
    }
}

/// Relation keyword/symbol to target operator, one row per synonym.
/// Lookups are case-insensitive; an unmapped keyword passes through
/// unchanged in both targets.
const RELATION_OPERATORS: &[(&str, &str, &str)] = &[
    ("equal to", "=", "$eq"),
    ("=", "=", "$eq"),
    ("greater than or equal to", ">=", "$gte"),
    (">=", ">=", "$gte"),
    ("less than or equal to", "<=", "$lte"),
    ("<=", "<=", "$lte"),
    ("is not equal to", "!=", "$ne"),
    ("not equal to", "!=", "$ne"),
    ("!=", "!=", "$ne"),
    ("greater than", ">", "$gt"),
    (">", ">", "$gt"),
    ("less than", "<", "$lt"),
    ("<", "<", "$lt"),
];

pub(crate) fn sql_operator(relation: &str) -> String {
    let lowered = relation.to_lowercase();
    RELATION_OPERATORS
        .iter()
        .find(|(keyword, _, _)| *keyword == lowered)
        .map(|(_, sql, _)| sql.to_string())
        .unwrap_or(lowered)
}

pub(crate) fn mongo_operator(relation: &str) -> String {
    let lowered = relation.to_lowercase();
    RELATION_OPERATORS
        .iter()
        .find(|(keyword, _, _)| *keyword == lowered)
        .map(|(_, _, mongo)| mongo.to_string())
        .unwrap_or(lowered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_mapped_keyword_has_both_operators() {
        for (keyword, sql, mongo) in RELATION_OPERATORS {
            assert_eq!(sql_operator(keyword), *sql);
            assert_eq!(mongo_operator(keyword), *mongo);
        }
    }

    #[test]
    fn test_unmapped_relation_passes_through() {
        assert_eq!(sql_operator("resembles"), "resembles");
        assert_eq!(mongo_operator("resembles"), "resembles");
    }
}
