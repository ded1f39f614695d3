//! CLI support for lingua-query
//!
//! Provides programmatic access to the translation pipeline for embedding
//! in other tools.

mod translate;

pub use translate::{execute_translate, render_schema, TranslateOptions};

use std::io;

use crate::schema::SchemaError;
use crate::TranslateError;

/// Errors that can occur during CLI operations
#[derive(Debug)]
pub enum CliError {
    /// Schema inference error
    Schema(SchemaError),
    /// Pipeline error from any translation stage
    Translate(TranslateError),
    /// IO error
    Io(io::Error),
    /// No query provided
    NoQuery,
    /// Unknown dialect name on the command line
    UnknownDialect(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Schema(e) => write!(f, "Schema error: {}", e),
            CliError::Translate(e) => write!(f, "{}", e),
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::NoQuery => {
                write!(f, "No query provided. Pass one as an argument or pipe it to stdin.")
            }
            CliError::UnknownDialect(name) => {
                write!(f, "Unknown dialect: '{}' (expected 'sql' or 'mongo')", name)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Schema(e) => Some(e),
            CliError::Translate(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SchemaError> for CliError {
    fn from(e: SchemaError) -> Self {
        CliError::Schema(e)
    }
}

impl From<TranslateError> for CliError {
    fn from(e: TranslateError) -> Self {
        CliError::Translate(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}
