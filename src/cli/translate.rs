//! Run the translation pipeline against sample files

use super::CliError;
use crate::schema::{Dialect, Schema};
use crate::translate_as;

/// Options for the translate command
#[derive(Debug, Clone, Default)]
pub struct TranslateOptions {
    /// The natural-language query to translate
    pub query: String,
    /// Sample data files the schema is inferred from
    pub samples: Vec<String>,
    /// Target dialect override; the schema's own dialect when absent
    pub dialect: Option<String>,
}

/// Infer the schema, translate the query, return the generated text.
pub fn execute_translate(options: &TranslateOptions) -> Result<String, CliError> {
    if options.query.trim().is_empty() {
        return Err(CliError::NoQuery);
    }

    let schema = Schema::infer(&options.samples)?;
    let dialect = match options.dialect.as_deref() {
        None => schema.dialect(),
        Some(name) => parse_dialect(name)?,
    };

    Ok(translate_as(&schema, &options.query, dialect)?)
}

/// One `table.field: TYPE` line per field, for inspection.
pub fn render_schema(samples: &[String]) -> Result<String, CliError> {
    let schema = Schema::infer(samples)?;
    let mut out = String::new();
    for table in schema.table_names() {
        if let Some(fields) = schema.fields(table) {
            for (field, ty) in fields {
                out.push_str(&format!(
                    "{}.{}: {}\n",
                    table,
                    field,
                    ty.name(schema.dialect())
                ));
            }
        }
    }
    Ok(out)
}

fn parse_dialect(name: &str) -> Result<Dialect, CliError> {
    match name.to_lowercase().as_str() {
        "sql" | "relational" => Ok(Dialect::Relational),
        "mongo" | "mongodb" | "document" => Ok(Dialect::Document),
        other => Err(CliError::UnknownDialect(other.to_string())),
    }
}
