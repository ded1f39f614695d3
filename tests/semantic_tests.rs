// tests/semantic_tests.rs

use std::collections::BTreeMap;

use lingua_query::grammar::Grammar;
use lingua_query::lexer::tokenize;
use lingua_query::parser::Parser;
use lingua_query::schema::{Dialect, FieldType, Schema};
use lingua_query::semantic::{analyze, SemanticError};

fn library_schema(dialect: Dialect) -> Schema {
    let mut schema = Schema::new(dialect);
    let mut books = BTreeMap::new();
    books.insert("title".to_string(), FieldType::Text);
    books.insert("pages".to_string(), FieldType::Integer);
    books.insert("rating".to_string(), FieldType::Real);
    books.insert("published".to_string(), FieldType::Date);
    books.insert("tags".to_string(), FieldType::Array);
    schema.add_table("books", books);
    schema
}

fn check(input: &str, dialect: Dialect) -> Result<(), SemanticError> {
    let schema = library_schema(dialect);
    let grammar = Grammar::for_schema(&schema);
    let tokens = tokenize(input, &grammar).unwrap();
    let statement = Parser::new(tokens).parse().unwrap();
    analyze(&statement, &schema)
}

// ============================================================================
// Field existence
// ============================================================================

#[test]
fn test_known_field_passes() {
    assert!(check("find books pages greater than 100", Dialect::Relational).is_ok());
}

#[test]
fn test_unknown_field_is_rejected() {
    // A field name outside the schema never lexes as FIELD, so reference
    // one the grammar knows but the schema does not: a registered alias
    let schema = library_schema(Dialect::Relational);
    let grammar = {
        let mut g = Grammar::for_schema(&schema);
        g.register_field("total");
        g
    };
    let tokens = tokenize("find books total greater than 10", &grammar).unwrap();
    let statement = Parser::new(tokens).parse().unwrap();
    let err = analyze(&statement, &schema).unwrap_err();
    assert!(matches!(err, SemanticError::UnknownField(field) if field == "total"));
}

// ============================================================================
// Type matching
// ============================================================================

#[test]
fn test_integer_field_accepts_digits_only() {
    assert!(check("find books pages equal to 350", Dialect::Relational).is_ok());
    let err = check("find books pages equal to 'many'", Dialect::Relational).unwrap_err();
    assert!(matches!(
        err,
        SemanticError::TypeMismatch { ref field, ref expected, .. }
            if field == "pages" && expected == "INTEGER"
    ));
}

#[test]
fn test_real_field_accepts_floats_and_integers() {
    assert!(check("find books rating greater than 3", Dialect::Relational).is_ok());
}

#[test]
fn test_text_field_requires_quotes() {
    assert!(check("find books title equal to 'Dune'", Dialect::Relational).is_ok());
    assert!(check(r#"find books title equal to "Dune""#, Dialect::Relational).is_ok());
    let err = check("find books title equal to 42", Dialect::Relational).unwrap_err();
    assert!(matches!(err, SemanticError::TypeMismatch { .. }));
}

#[test]
fn test_date_field_requires_iso_shape() {
    assert!(check("find books published equal to '2023-06-01'", Dialect::Relational).is_ok());
    let err = check("find books published equal to 'June'", Dialect::Relational).unwrap_err();
    assert!(matches!(err, SemanticError::TypeMismatch { .. }));
}

#[test]
fn test_mismatch_names_the_dialect_type() {
    let err = check("find books pages equal to 'many'", Dialect::Document).unwrap_err();
    assert!(matches!(
        err,
        SemanticError::TypeMismatch { ref expected, .. } if expected == "int32"
    ));
}

// ============================================================================
// Statement coverage
// ============================================================================

#[test]
fn test_update_set_pairs_are_checked() {
    let err = check(
        "update books set pages equal to 'lots' title equal to 'Dune'",
        Dialect::Relational,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        SemanticError::TypeMismatch { ref field, .. } if field == "pages"
    ));
}

#[test]
fn test_update_condition_is_checked_too() {
    let err = check(
        "update books set title equal to 'Dune' pages equal to 'x'",
        Dialect::Relational,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        SemanticError::TypeMismatch { ref field, .. } if field == "pages"
    ));
}

#[test]
fn test_insert_contents_are_not_type_checked() {
    // Contents are interpolated as scanned; only conditions and set pairs
    // are validated
    assert!(check("insert into books pages 'not a number'", Dialect::Relational).is_ok());
}
