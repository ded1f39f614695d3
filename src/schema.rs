//! Schema inference from sample data sources.
//!
//! A schema is built once per session from one or more sample files: tabular
//! sources (CSV, header plus one data row) map to the relational dialect,
//! document sources (JSON, object or array-of-objects) to the document
//! dialect. Each field's type is decided by its first sampled value.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use regex::Regex;

/// Target query language family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// SQL-like relational target
    Relational,
    /// MongoDB-like document target
    Document,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Relational => write!(f, "SQL"),
            Dialect::Document => write!(f, "MongoDB"),
        }
    }
}

/// Primitive type tag inferred for a field.
///
/// One closed set serves both dialects; the display name is
/// dialect-conditioned (`INTEGER` vs `int32`, `TEXT` vs `string`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Null,
    Boolean,
    Integer,
    Real,
    Array,
    Document,
    Date,
    DateTime,
    Text,
}

impl FieldType {
    /// The type name under the given dialect's conventions.
    pub fn name(&self, dialect: Dialect) -> &'static str {
        match dialect {
            Dialect::Relational => match self {
                FieldType::Null => "NULL",
                FieldType::Boolean => "BOOLEAN",
                FieldType::Integer => "INTEGER",
                FieldType::Real => "REAL",
                FieldType::Array => "ARRAY",
                FieldType::Document => "JSON",
                FieldType::Date => "DATE",
                FieldType::DateTime => "DATETIME",
                FieldType::Text => "TEXT",
            },
            Dialect::Document => match self {
                FieldType::Null => "null",
                FieldType::Boolean => "bool",
                FieldType::Integer => "int32",
                FieldType::Real => "double",
                FieldType::Array => "array",
                FieldType::Document => "document",
                FieldType::Date => "date",
                // The document dialect has no separate datetime tag
                FieldType::DateTime => "date",
                FieldType::Text => "string",
            },
        }
    }

    /// Infer a type from one raw tabular cell.
    ///
    /// The checks are order-sensitive; the first matching rule wins.
    pub fn infer_relational(raw: &str) -> FieldType {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return FieldType::Null;
        }
        if trimmed.eq_ignore_ascii_case("true") || trimmed.eq_ignore_ascii_case("false") {
            return FieldType::Boolean;
        }
        if trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return FieldType::Integer;
        }
        if trimmed.contains('.') && trimmed.parse::<f64>().is_ok() {
            return FieldType::Real;
        }
        if trimmed.starts_with('[') && trimmed.ends_with(']') {
            return FieldType::Array;
        }
        if trimmed.starts_with('{')
            && trimmed.ends_with('}')
            && serde_json::from_str::<serde_json::Value>(trimmed).is_ok()
        {
            return FieldType::Document;
        }
        if is_iso_date(trimmed) {
            return FieldType::Date;
        }
        if is_iso_datetime(trimmed) {
            return FieldType::DateTime;
        }
        FieldType::Text
    }

    /// Infer a type from one sampled JSON value.
    ///
    /// Structural JSON types decide directly; strings fall back to the same
    /// shape rules as tabular cells.
    pub fn infer_document(value: &serde_json::Value) -> FieldType {
        match value {
            serde_json::Value::Null => FieldType::Null,
            serde_json::Value::Bool(_) => FieldType::Boolean,
            serde_json::Value::Number(n) => {
                if n.is_i64() || n.is_u64() {
                    FieldType::Integer
                } else {
                    FieldType::Real
                }
            }
            serde_json::Value::Array(_) => FieldType::Array,
            serde_json::Value::Object(_) => FieldType::Document,
            serde_json::Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return FieldType::Null;
                }
                if trimmed.eq_ignore_ascii_case("true") || trimmed.eq_ignore_ascii_case("false") {
                    return FieldType::Boolean;
                }
                if trimmed.bytes().all(|b| b.is_ascii_digit()) {
                    return FieldType::Integer;
                }
                if trimmed.contains('.') && trimmed.parse::<f64>().is_ok() {
                    return FieldType::Real;
                }
                if trimmed.starts_with('[') && trimmed.ends_with(']') {
                    return FieldType::Array;
                }
                if trimmed.starts_with('{')
                    && trimmed.ends_with('}')
                    && serde_json::from_str::<serde_json::Value>(trimmed).is_ok()
                {
                    return FieldType::Document;
                }
                if is_iso_date(trimmed) {
                    return FieldType::Date;
                }
                FieldType::Text
            }
        }
    }
}

pub(crate) fn is_iso_date(s: &str) -> bool {
    let re = Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern must compile");
    re.is_match(s)
}

pub(crate) fn is_iso_datetime(s: &str) -> bool {
    let re =
        Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}$").expect("datetime pattern must compile");
    re.is_match(s)
}

/// Errors raised while inferring a schema from sample sources.
#[derive(Debug)]
pub enum SchemaError {
    /// A tabular source had no data row, or a document source was an empty array
    EmptySample(String),
    /// The document root was neither an object nor an array of objects
    UnsupportedRoot(String),
    /// The file extension maps to no known source kind
    UnsupportedFormat(String),
    /// No sample sources were given at all
    NoSources,
    /// Could not read the source
    Io(std::io::Error),
    /// The tabular source was malformed
    Csv(csv::Error),
    /// The document source was not valid JSON
    Json(serde_json::Error),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::EmptySample(table) => {
                write!(f, "Sample source '{}' contains no data to infer from", table)
            }
            SchemaError::UnsupportedRoot(table) => write!(
                f,
                "Sample source '{}' must be an object or an array of objects",
                table
            ),
            SchemaError::UnsupportedFormat(path) => {
                write!(f, "Unsupported sample format: '{}' (expected .csv or .json)", path)
            }
            SchemaError::NoSources => write!(f, "No sample sources provided"),
            SchemaError::Io(e) => write!(f, "IO error: {}", e),
            SchemaError::Csv(e) => write!(f, "Invalid CSV: {}", e),
            SchemaError::Json(e) => write!(f, "Invalid JSON: {}", e),
        }
    }
}

impl std::error::Error for SchemaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SchemaError::Io(e) => Some(e),
            SchemaError::Csv(e) => Some(e),
            SchemaError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SchemaError {
    fn from(e: std::io::Error) -> Self {
        SchemaError::Io(e)
    }
}

impl From<csv::Error> for SchemaError {
    fn from(e: csv::Error) -> Self {
        SchemaError::Csv(e)
    }
}

impl From<serde_json::Error> for SchemaError {
    fn from(e: serde_json::Error) -> Self {
        SchemaError::Json(e)
    }
}

/// Field types per table, plus the session dialect.
///
/// Built once from sample sources and read-only afterwards. Tables and
/// fields iterate in name order, so lookups that scan every table resolve
/// the same way on every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    dialect: Dialect,
    tables: BTreeMap<String, BTreeMap<String, FieldType>>,
}

impl Schema {
    /// An empty schema for the given dialect.
    pub fn new(dialect: Dialect) -> Self {
        Schema {
            dialect,
            tables: BTreeMap::new(),
        }
    }

    /// Infer a schema from sample files. The first source decides the
    /// dialect; later sources of the other kind still merge their tables.
    pub fn infer<P: AsRef<Path>>(paths: &[P]) -> Result<Self, SchemaError> {
        let mut schema: Option<Schema> = None;

        for path in paths {
            let path = path.as_ref();
            let table = table_name(path)?;
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or_default()
                .to_ascii_lowercase();

            let (dialect, fields) = match ext.as_str() {
                "csv" => (Dialect::Relational, fields_from_csv(&table, File::open(path)?)?),
                "json" => {
                    let mut text = String::new();
                    File::open(path)?.read_to_string(&mut text)?;
                    let value: serde_json::Value = serde_json::from_str(&text)?;
                    (Dialect::Document, fields_from_json(&table, &value)?)
                }
                _ => return Err(SchemaError::UnsupportedFormat(path.display().to_string())),
            };

            log::debug!("inferred {} fields for table '{}'", fields.len(), table);

            // The first source creates the schema and fixes the dialect;
            // later sources only contribute tables
            schema
                .get_or_insert_with(|| Schema::new(dialect))
                .add_table(table, fields);
        }

        schema.ok_or(SchemaError::NoSources)
    }

    /// Register a table's field types. Used by inference and by callers
    /// assembling a schema programmatically.
    pub fn add_table(&mut self, table: impl Into<String>, fields: BTreeMap<String, FieldType>) {
        self.tables.insert(table.into(), fields);
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// All table names, in deterministic order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(|s| s.as_str())
    }

    /// All distinct field names across every table, in deterministic order.
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .tables
            .values()
            .flat_map(|fields| fields.keys().map(|s| s.as_str()))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Look a field up across all tables; the first table (in name order)
    /// that defines it wins. The query language has no table qualification
    /// inside conditions, so a cross-table collision resolves this way.
    pub fn lookup_field(&self, field: &str) -> Option<FieldType> {
        self.tables
            .values()
            .find_map(|fields| fields.get(field).copied())
    }

    pub fn fields(&self, table: &str) -> Option<&BTreeMap<String, FieldType>> {
        self.tables.get(table)
    }
}

/// Table name = source file stem (name minus extension).
fn table_name(path: &Path) -> Result<String, SchemaError> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
        .ok_or_else(|| SchemaError::UnsupportedFormat(path.display().to_string()))
}

/// Infer field types from a tabular source: header row plus exactly one
/// data row.
pub fn fields_from_csv<R: Read>(
    table: &str,
    reader: R,
) -> Result<BTreeMap<String, FieldType>, SchemaError> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers()?.clone();

    let first = match reader.records().next() {
        Some(record) => record?,
        None => return Err(SchemaError::EmptySample(table.to_string())),
    };

    Ok(headers
        .iter()
        .zip(first.iter())
        .map(|(header, cell)| (header.to_string(), FieldType::infer_relational(cell)))
        .collect())
}

/// Infer field types from a document source.
///
/// A root object contributes its top-level keys; a root array contributes
/// the first element's keys, with a field literally named `_id` always
/// treated as a string regardless of its sampled form.
pub fn fields_from_json(
    table: &str,
    value: &serde_json::Value,
) -> Result<BTreeMap<String, FieldType>, SchemaError> {
    match value {
        serde_json::Value::Object(map) => Ok(map
            .iter()
            .map(|(field, v)| (field.clone(), FieldType::infer_document(v)))
            .collect()),
        serde_json::Value::Array(items) => {
            let first = items
                .first()
                .ok_or_else(|| SchemaError::EmptySample(table.to_string()))?;
            let map = first
                .as_object()
                .ok_or_else(|| SchemaError::UnsupportedRoot(table.to_string()))?;
            Ok(map
                .iter()
                .map(|(field, v)| {
                    let ty = if field == "_id" {
                        FieldType::Text
                    } else {
                        FieldType::infer_document(v)
                    };
                    (field.clone(), ty)
                })
                .collect())
        }
        _ => Err(SchemaError::UnsupportedRoot(table.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relational_inference_order() {
        assert_eq!(FieldType::infer_relational("42"), FieldType::Integer);
        assert_eq!(FieldType::infer_relational("3.14"), FieldType::Real);
        assert_eq!(FieldType::infer_relational("'hello'"), FieldType::Text);
        assert_eq!(FieldType::infer_relational(""), FieldType::Null);
        assert_eq!(FieldType::infer_relational("true"), FieldType::Boolean);
        assert_eq!(FieldType::infer_relational("[1, 2]"), FieldType::Array);
        assert_eq!(FieldType::infer_relational(r#"{"a": 1}"#), FieldType::Document);
        assert_eq!(FieldType::infer_relational("2024-01-31"), FieldType::Date);
        assert_eq!(
            FieldType::infer_relational("2024-01-31T08:30:00"),
            FieldType::DateTime
        );
    }

    #[test]
    fn test_document_inference_from_json_types() {
        assert_eq!(
            FieldType::infer_document(&serde_json::json!(7)),
            FieldType::Integer
        );
        assert_eq!(
            FieldType::infer_document(&serde_json::json!(1.5)),
            FieldType::Real
        );
        assert_eq!(
            FieldType::infer_document(&serde_json::json!([1, 2])),
            FieldType::Array
        );
        assert_eq!(
            FieldType::infer_document(&serde_json::json!({"a": 1})),
            FieldType::Document
        );
        assert_eq!(
            FieldType::infer_document(&serde_json::json!("12")),
            FieldType::Integer
        );
        assert_eq!(
            FieldType::infer_document(&serde_json::json!(null)),
            FieldType::Null
        );
    }

    #[test]
    fn test_csv_needs_a_data_row() {
        let fields = fields_from_csv("people", "id,name,age\n1,'Ada',36\n".as_bytes()).unwrap();
        assert_eq!(fields.get("id"), Some(&FieldType::Integer));
        assert_eq!(fields.get("name"), Some(&FieldType::Text));
        assert_eq!(fields.get("age"), Some(&FieldType::Integer));

        let err = fields_from_csv("people", "id,name,age\n".as_bytes()).unwrap_err();
        assert!(matches!(err, SchemaError::EmptySample(_)));
    }

    #[test]
    fn test_json_array_forces_id_to_string() {
        let value = serde_json::json!([{"_id": 12345, "title": "one"}]);
        let fields = fields_from_json("products", &value).unwrap();
        assert_eq!(fields.get("_id"), Some(&FieldType::Text));
        assert_eq!(fields.get("title"), Some(&FieldType::Text));
    }

    #[test]
    fn test_json_root_must_be_object_or_array() {
        let err = fields_from_json("products", &serde_json::json!([])).unwrap_err();
        assert!(matches!(err, SchemaError::EmptySample(_)));

        let err = fields_from_json("products", &serde_json::json!(42)).unwrap_err();
        assert!(matches!(err, SchemaError::UnsupportedRoot(_)));
    }

    #[test]
    fn test_field_lookup_scans_tables_in_name_order() {
        let mut schema = Schema::new(Dialect::Relational);
        let mut a = BTreeMap::new();
        a.insert("shared".to_string(), FieldType::Integer);
        let mut b = BTreeMap::new();
        b.insert("shared".to_string(), FieldType::Text);
        schema.add_table("zebra", b);
        schema.add_table("apple", a);

        // "apple" sorts first, so its type wins
        assert_eq!(schema.lookup_field("shared"), Some(FieldType::Integer));
        assert_eq!(schema.lookup_field("missing"), None);
    }
}
