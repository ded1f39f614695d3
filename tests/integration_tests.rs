// tests/integration_tests.rs

use std::collections::BTreeMap;

use lingua_query::schema::{fields_from_csv, fields_from_json, Dialect, FieldType, Schema};
use lingua_query::{translate, translate_as, TranslateError};

fn people_schema(dialect: Dialect) -> Schema {
    let mut schema = Schema::new(dialect);
    let mut fields = BTreeMap::new();
    fields.insert("age".to_string(), FieldType::Integer);
    fields.insert("name".to_string(), FieldType::Text);
    schema.add_table("people", fields);
    schema
}

// ============================================================================
// End to end
// ============================================================================

#[test]
fn test_select_to_sql() {
    let schema = people_schema(Dialect::Relational);
    assert_eq!(
        translate(&schema, "search for people where age greater than 30").unwrap(),
        "SELECT * FROM people WHERE age > 30;"
    );
}

#[test]
fn test_select_to_mongo() {
    let schema = people_schema(Dialect::Document);
    assert_eq!(
        translate(&schema, "search for people where age greater than 30").unwrap(),
        "db.people.find({age: {$gt: 30}});"
    );
}

#[test]
fn test_dialect_override() {
    let schema = people_schema(Dialect::Relational);
    assert_eq!(
        translate_as(&schema, "search for people age equal to 30", Dialect::Document).unwrap(),
        "db.people.find({age: {$eq: 30}});"
    );
}

#[test]
fn test_translation_is_deterministic() {
    let schema = people_schema(Dialect::Relational);
    let query = "find people age greater than 30 and name equal to 'Ada' or age less than 3";
    let first = translate(&schema, query).unwrap();
    let second = translate(&schema, query).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_stage_errors_are_terminal() {
    let schema = people_schema(Dialect::Relational);

    // parse error: the verb is missing
    assert!(matches!(
        translate(&schema, "people age greater than 30"),
        Err(TranslateError::Parse(_))
    ));

    // semantic error: quoted text against an integer field
    assert!(matches!(
        translate(&schema, "find people age equal to 'old'"),
        Err(TranslateError::Semantic(_))
    ));
}

#[test]
fn test_full_pipeline_from_csv_sample() {
    let fields = fields_from_csv("people", "name,age,score\n'Ada',36,9.5\n".as_bytes()).unwrap();
    let mut schema = Schema::new(Dialect::Relational);
    schema.add_table("people", fields);

    assert_eq!(
        translate(&schema, "search for people score greater than or equal to 9 and age less than 40")
            .unwrap(),
        "SELECT * FROM people WHERE score >= 9 AND age < 40;"
    );
}

#[test]
fn test_full_pipeline_from_json_sample() {
    let value = serde_json::json!([
        {"_id": 1, "title": "Pashmina Shawl", "stock": 12}
    ]);
    let fields = fields_from_json("products", &value).unwrap();
    let mut schema = Schema::new(Dialect::Document);
    schema.add_table("products", fields);

    assert_eq!(
        translate(&schema, "update products set stock equal to 9 title equal to 'Pashmina Shawl'")
            .unwrap(),
        "db.products.updateMany({title: {$eq: \"Pashmina Shawl\"}}, {$set: {stock: 9}});"
    );
}

#[test]
fn test_schema_files_round_trip() {
    let dir = std::env::temp_dir().join("lingua-query-tests");
    std::fs::create_dir_all(&dir).unwrap();
    let csv_path = dir.join("people.csv");
    let json_path = dir.join("products.json");
    std::fs::write(&csv_path, "name,age\n'Ada',36\n").unwrap();
    std::fs::write(&json_path, r#"[{"_id": 1, "title": "one"}]"#).unwrap();

    let schema = Schema::infer(&[&csv_path, &json_path]).unwrap();
    // first source decides the dialect; both tables merge
    assert_eq!(schema.dialect(), Dialect::Relational);
    let tables: Vec<&str> = schema.table_names().collect();
    assert_eq!(tables, vec!["people", "products"]);
    assert_eq!(schema.lookup_field("age"), Some(FieldType::Integer));
    assert_eq!(schema.lookup_field("_id"), Some(FieldType::Text));

    assert_eq!(
        translate(&schema, "find people age greater than 18").unwrap(),
        "SELECT * FROM people WHERE age > 18;"
    );
}

// ============================================================================
// Aggregation aliases end to end
// ============================================================================

#[test]
fn test_computed_alias_flows_through_projection() {
    let mut schema = Schema::new(Dialect::Document);
    let mut fields = BTreeMap::new();
    fields.insert("region".to_string(), FieldType::Text);
    fields.insert("amount".to_string(), FieldType::Integer);
    schema.add_table("sales", fields);

    assert_eq!(
        translate(
            &schema,
            "aggregate sales group region calculate 'total' amount project region total"
        )
        .unwrap(),
        "db.sales.aggregate([{$group: {_id: \"$region\", total: {$sum: \"$amount\"}}}, \
         {$project: {region: 1, total: 1}}]);"
    );
}
