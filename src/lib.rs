pub mod ast;
pub mod codegen;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod schema;
pub mod semantic;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{Statement, Token, TokenKind};
pub use codegen::{generate, GenError};
pub use grammar::{Grammar, GrammarRule};
pub use lexer::{tokenize, LexError};
pub use parser::{ParseError, Parser};
pub use schema::{Dialect, FieldType, Schema, SchemaError};
pub use semantic::{analyze, SemanticError};

/// Any stage failure, for callers that drive the whole pipeline through
/// [translate]. Each stage either returns a fully valid successor
/// structure or an error; the first failure is terminal.
#[derive(Debug)]
pub enum TranslateError {
    Lex(LexError),
    Parse(ParseError),
    Semantic(SemanticError),
    Gen(GenError),
}

impl std::fmt::Display for TranslateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranslateError::Lex(e) => write!(f, "Lexical error: {}", e),
            TranslateError::Parse(e) => write!(f, "Parse error: {}", e),
            TranslateError::Semantic(e) => write!(f, "Semantic error: {}", e),
            TranslateError::Gen(e) => write!(f, "Generation error: {}", e),
        }
    }
}

impl std::error::Error for TranslateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TranslateError::Lex(e) => Some(e),
            TranslateError::Parse(e) => Some(e),
            TranslateError::Semantic(e) => Some(e),
            TranslateError::Gen(e) => Some(e),
        }
    }
}

impl From<LexError> for TranslateError {
    fn from(e: LexError) -> Self {
        TranslateError::Lex(e)
    }
}

impl From<ParseError> for TranslateError {
    fn from(e: ParseError) -> Self {
        TranslateError::Parse(e)
    }
}

impl From<SemanticError> for TranslateError {
    fn from(e: SemanticError) -> Self {
        TranslateError::Semantic(e)
    }
}

impl From<GenError> for TranslateError {
    fn from(e: GenError) -> Self {
        TranslateError::Gen(e)
    }
}

/// Translate one query for the schema's own dialect.
pub fn translate(schema: &Schema, query: &str) -> Result<String, TranslateError> {
    translate_as(schema, query, schema.dialect())
}

/// Translate one query, overriding the target dialect.
///
/// Each call builds its own grammar value, so concurrent sessions over a
/// shared schema never interfere.
pub fn translate_as(
    schema: &Schema,
    query: &str,
    dialect: Dialect,
) -> Result<String, TranslateError> {
    let grammar = Grammar::for_schema(schema);
    let tokens = tokenize(query, &grammar)?;
    log::debug!("scanned {} tokens", tokens.len());

    let mut parser = Parser::new(tokens);
    let statement = parser.parse()?;

    analyze(&statement, schema)?;
    Ok(generate(&statement, dialect)?)
}
