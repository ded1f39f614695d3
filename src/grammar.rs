//! Schema-conditioned lexical grammar.
//!
//! A [Grammar] is an ordered list of rules built fresh for one schema: the
//! verb, relation and stage vocabularies are fixed, while the FIELD and
//! TABLE_NAME rules are alternations over the schema's names. Rule order is
//! match priority: the first rule that matches at the cursor wins, even
//! when a later rule would consume more text. WHITESPACE and the INVALID
//! catch-all are always the last two rules.

use regex::Regex;

use crate::ast::TokenKind;
use crate::schema::Schema;

/// Verbs that select rows or documents.
pub const SELECT_VERBS: &[&str] = &[
    "search for",
    "look for",
    "look up",
    "retrieve",
    "select",
    "query",
    "fetch",
    "find",
    "read",
    "access",
    "filter",
    "extract",
    "get",
    "match",
];

/// Verbs that insert records.
pub const INSERT_VERBS: &[&str] = &["insert into", "insert", "add", "create", "store", "append"];

/// Verbs that update records.
pub const UPDATE_VERBS: &[&str] = &["update", "modify", "edit", "change", "alter", "revise"];

/// Verbs that delete records.
pub const DELETE_VERBS: &[&str] = &["delete from", "delete", "remove", "erase", "drop", "discard"];

/// Verbs that open a document-dialect pipeline.
pub const AGGREGATE_VERBS: &[&str] = &["aggregate", "summarize"];

/// Verbs that open a relational-dialect pipeline.
pub const GENERATE_VERBS: &[&str] = &["generate", "report"];

/// Relational phrases. Multi-word phrases must precede their prefixes so
/// `greater than or equal to` is never split.
const RELATION_PHRASES: &[&str] = &[
    "greater than or equal to",
    "less than or equal to",
    "is not equal to",
    "not equal to",
    "greater than",
    "less than",
    "equal to",
    "set",
];

/// Symbolic relation operators; matched without word boundaries.
const RELATION_SYMBOLS: &[&str] = &[">=", "<=", "!=", ">", "<", "="];

const LOGICAL_OPERATORS: &[&str] = &["and", "or", "nor"];

const AGGREGATION_OPERATORS: &[&str] =
    &["join", "group", "sort", "unwind", "project", "limit", "skip"];

const GROUP_OPERATORS: &[&str] = &["calculate", "collect", "list"];

const SORT_OPERATORS: &[&str] = &["increasingly", "decreasingly"];

/// Unsigned integer, or single- or double-quoted text.
const VALUE_PATTERN: &str = r#"\d+|'[^']*'|"[^"]*""#;

/// A pattern that can never match; stands in for an empty alternation.
const NEVER: &str = r"[^\s\S]";

/// One ordered lexical rule.
#[derive(Debug, Clone)]
pub struct GrammarRule {
    pub kind: TokenKind,
    pub pattern: Regex,
}

/// The ordered rule list for one schema, plus the field names backing the
/// FIELD rule so a lexer-local clone can extend it.
#[derive(Debug, Clone)]
pub struct Grammar {
    rules: Vec<GrammarRule>,
    field_names: Vec<String>,
}

impl Grammar {
    /// Build the rule list for a schema. Each call returns an independent
    /// value; nothing is shared between sessions.
    pub fn for_schema(schema: &Schema) -> Grammar {
        // An empty name would turn the alternation into a zero-width match
        // and stall the lexer's cursor
        let field_names: Vec<String> = schema
            .field_names()
            .into_iter()
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect();
        let table_names: Vec<String> = schema
            .table_names()
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect();

        let rules = vec![
            rule(TokenKind::Keyword, &word_alternation(&all_verbs())),
            rule(TokenKind::Relation, &relation_pattern()),
            rule(TokenKind::Field, &word_alternation(&field_names)),
            rule(TokenKind::LogicalOperator, &word_alternation(LOGICAL_OPERATORS)),
            rule(TokenKind::Value, VALUE_PATTERN),
            rule(
                TokenKind::AggregationOperator,
                &word_alternation(AGGREGATION_OPERATORS),
            ),
            rule(TokenKind::GroupOperator, &word_alternation(GROUP_OPERATORS)),
            rule(TokenKind::SortOperator, &word_alternation(SORT_OPERATORS)),
            rule(TokenKind::TableName, &word_alternation(&table_names)),
            rule(TokenKind::Whitespace, r"\s+"),
            rule(TokenKind::Invalid, r"(?s)."),
        ];

        Grammar { rules, field_names }
    }

    pub fn rules(&self) -> &[GrammarRule] {
        &self.rules
    }

    /// Add a field name alternative for the rest of this grammar value's
    /// life. The lexer calls this on its own clone when it sees a computed
    /// alias; the builder's output is never written back.
    pub fn register_field(&mut self, name: &str) {
        if name.is_empty() || self.field_names.iter().any(|f| f == name) {
            return;
        }
        self.field_names.push(name.to_string());
        let pattern = word_alternation(&self.field_names);
        if let Some(field_rule) = self
            .rules
            .iter_mut()
            .find(|r| r.kind == TokenKind::Field)
        {
            field_rule.pattern = compile(&pattern);
        }
    }
}

fn rule(kind: TokenKind, pattern: &str) -> GrammarRule {
    GrammarRule {
        kind,
        pattern: compile(pattern),
    }
}

fn compile(pattern: &str) -> Regex {
    // Vocabularies are static and dynamic names are regex-escaped, so a
    // failure here is a bug in rule construction, not an input error.
    Regex::new(pattern).expect("grammar rule pattern must compile")
}

fn all_verbs() -> Vec<&'static str> {
    SELECT_VERBS
        .iter()
        .chain(INSERT_VERBS)
        .chain(UPDATE_VERBS)
        .chain(DELETE_VERBS)
        .chain(AGGREGATE_VERBS)
        .chain(GENERATE_VERBS)
        .copied()
        .collect()
}

/// Word-bounded alternation, longest alternative first so no name is
/// captured as a prefix of a longer one.
fn word_alternation<S: AsRef<str>>(words: &[S]) -> String {
    if words.is_empty() {
        return NEVER.to_string();
    }
    let mut escaped: Vec<String> = words.iter().map(|w| regex::escape(w.as_ref())).collect();
    escaped.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    format!(r"\b(?:{})\b", escaped.join("|"))
}

/// Relation rule: word-bounded phrases plus bare symbols. Symbols sit
/// outside the word boundary group because `\b` never matches next to `>`.
fn relation_pattern() -> String {
    let phrases = word_alternation(RELATION_PHRASES);
    let symbols: Vec<String> = RELATION_SYMBOLS.iter().map(|s| regex::escape(s)).collect();
    format!("{}|{}", phrases, symbols.join("|"))
}
