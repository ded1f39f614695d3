//! Semantic validation of a parsed statement against the schema.
//!
//! Every referenced field must exist in some table, and every literal's
//! lexical shape must match the field's inferred type under the active
//! dialect's conventions. Analysis is advisory-strict: the first failure
//! halts the translation; there is no recovery or partial generation.

use crate::ast::{ConditionChain, Literal, SetClause, Statement};
use crate::schema::{is_iso_date, is_iso_datetime, FieldType, Schema};

/// A statement that parsed but contradicts the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticError {
    /// The field exists in no table of the schema
    UnknownField(String),
    /// The literal's shape does not match the field's inferred type
    TypeMismatch {
        field: String,
        value: String,
        expected: String,
    },
}

impl std::fmt::Display for SemanticError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SemanticError::UnknownField(field) => {
                write!(f, "Field '{}' is not defined in the schema", field)
            }
            SemanticError::TypeMismatch {
                field,
                value,
                expected,
            } => write!(
                f,
                "Value '{}' does not match the expected type '{}' for field '{}'",
                value, expected, field
            ),
        }
    }
}

impl std::error::Error for SemanticError {}

/// Validate every condition and set-clause pair of the statement.
///
/// Field lookup scans all tables; the language has no table qualification
/// inside conditions, so a name colliding across tables resolves to the
/// first table in deterministic order.
pub fn analyze(statement: &Statement, schema: &Schema) -> Result<(), SemanticError> {
    match statement {
        Statement::Select(select) => check_chain(&select.condition, schema),
        Statement::Delete(delete) => check_chain(&delete.condition, schema),
        Statement::Update(update) => {
            check_set_clause(&update.set, schema)?;
            check_chain(&update.condition, schema)
        }
        // Insert contents and pipeline stages are interpolated as scanned
        Statement::Insert(_) | Statement::Aggregate(_) | Statement::Generate(_) => Ok(()),
    }
}

fn check_chain(chain: &ConditionChain, schema: &Schema) -> Result<(), SemanticError> {
    for condition in chain.conditions() {
        check_pair(&condition.field, &condition.value, schema)?;
    }
    Ok(())
}

fn check_set_clause(set: &SetClause, schema: &Schema) -> Result<(), SemanticError> {
    for assignment in &set.assignments {
        check_pair(&assignment.field, &assignment.value, schema)?;
    }
    Ok(())
}

fn check_pair(field: &str, value: &Literal, schema: &Schema) -> Result<(), SemanticError> {
    let field_type = schema
        .lookup_field(field)
        .ok_or_else(|| SemanticError::UnknownField(field.to_string()))?;

    if !literal_matches(field_type, value) {
        return Err(SemanticError::TypeMismatch {
            field: field.to_string(),
            value: value.text.clone(),
            expected: field_type.name(schema.dialect()).to_string(),
        });
    }
    Ok(())
}

/// Whether a scanned literal's shape satisfies a field type.
///
/// The conventions are shared by both dialects; the dialect only changes
/// the type name reported on mismatch.
fn literal_matches(field_type: FieldType, value: &Literal) -> bool {
    match field_type {
        FieldType::Integer => value.is_numeric(),
        FieldType::Real => value.text.parse::<f64>().is_ok(),
        FieldType::Text => value.is_quoted(),
        FieldType::Array => value.text.starts_with('[') && value.text.ends_with(']'),
        FieldType::Document => {
            let inner = value.unquoted();
            inner.starts_with('{')
                && inner.ends_with('}')
                && serde_json::from_str::<serde_json::Value>(inner).is_ok()
        }
        FieldType::Date => is_iso_date(value.unquoted()),
        FieldType::DateTime => is_iso_datetime(value.unquoted()),
        FieldType::Boolean => {
            let inner = value.unquoted();
            inner.eq_ignore_ascii_case("true") || inner.eq_ignore_ascii_case("false")
        }
        // A sampled null says nothing about what the field accepts
        FieldType::Null => false,
    }
}
