use crate::ast::{Token, TokenKind};
use crate::grammar::Grammar;

/// No rule matched at a position. Unreachable while the grammar ends with
/// the single-character INVALID catch-all, but the contract is kept for
/// completeness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub position: usize,
    pub character: char,
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Illegal character '{}' at position {}",
            self.character, self.position
        )
    }
}

impl std::error::Error for LexError {}

/// Scan the input left to right against the grammar's ordered rules.
///
/// At each position the first rule that matches anchored at the cursor wins,
/// never the longest overall match. WHITESPACE is dropped silently; INVALID
/// is dropped with a diagnostic.
///
/// One side effect is permitted: a VALUE immediately following a
/// GROUP_OPERATOR whose text is not purely numeric names a computed
/// aggregate output, so it is registered as a FIELD alternative for the
/// rest of this call. The registration happens on a local clone; the
/// grammar passed in is never modified.
pub fn tokenize(input: &str, grammar: &Grammar) -> Result<Vec<Token>, LexError> {
    let mut grammar = grammar.clone();
    let mut tokens: Vec<Token> = Vec::new();
    let mut pos = 0;

    while pos < input.len() {
        let mut matched = None;
        for rule in grammar.rules() {
            // find_at scans forward; a hit counts only if it starts at the
            // cursor. This keeps word-boundary context intact, unlike
            // re-matching against a slice.
            if let Some(m) = rule.pattern.find_at(input, pos) {
                if m.start() == pos {
                    matched = Some((rule.kind, m.end()));
                    break;
                }
            }
        }

        let Some((kind, end)) = matched else {
            let character = input[pos..].chars().next().unwrap_or('\u{fffd}');
            return Err(LexError {
                position: pos,
                character,
            });
        };

        match kind {
            TokenKind::Whitespace => {}
            TokenKind::Invalid => {
                log::warn!(
                    "discarding unrecognized character {:?} at position {}",
                    &input[pos..end],
                    pos
                );
            }
            _ => {
                let text = &input[pos..end];
                if kind == TokenKind::Value
                    && tokens.last().map(|t| t.kind) == Some(TokenKind::GroupOperator)
                {
                    let alias = trim_quotes(text);
                    if !alias.bytes().all(|b| b.is_ascii_digit()) {
                        log::debug!("registering computed field alias '{}'", alias);
                        grammar.register_field(alias);
                    }
                }
                tokens.push(Token::new(kind, text));
            }
        }

        pos = end;
    }

    Ok(tokens)
}

fn trim_quotes(text: &str) -> &str {
    let bytes = text.as_bytes();
    if bytes.len() >= 2
        && ((bytes[0] == b'\'' && bytes[bytes.len() - 1] == b'\'')
            || (bytes[0] == b'"' && bytes[bytes.len() - 1] == b'"'))
    {
        &text[1..text.len() - 1]
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Dialect, FieldType, Schema};
    use std::collections::BTreeMap;

    fn sample_grammar() -> Grammar {
        let mut schema = Schema::new(Dialect::Relational);
        let mut fields = BTreeMap::new();
        fields.insert("age".to_string(), FieldType::Integer);
        fields.insert("amount".to_string(), FieldType::Integer);
        fields.insert("region".to_string(), FieldType::Text);
        schema.add_table("sales", fields);
        Grammar::for_schema(&schema)
    }

    #[test]
    fn test_filler_words_are_discarded() {
        let grammar = sample_grammar();
        let tokens = tokenize("search for sales where age greater than 30", &grammar).unwrap();
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        // "where" is not part of any vocabulary: dropped character by
        // character through the INVALID catch-all
        assert_eq!(
            kinds,
            vec![
                TokenKind::Keyword,
                TokenKind::TableName,
                TokenKind::Field,
                TokenKind::Relation,
                TokenKind::Value,
            ]
        );
    }

    #[test]
    fn test_first_rule_wins_over_longer_match() {
        let grammar = sample_grammar();
        // "sort" is an AGGREGATION_OPERATOR; it must not be swallowed by a
        // later rule even at the same position
        let tokens = tokenize("sort age increasingly", &grammar).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::AggregationOperator);
        assert_eq!(tokens[1].kind, TokenKind::Field);
        assert_eq!(tokens[2].kind, TokenKind::SortOperator);
    }

    #[test]
    fn test_alias_registration_after_group_operator() {
        let grammar = sample_grammar();
        let tokens = tokenize(
            "aggregate sales group region calculate 'total' amount project region total",
            &grammar,
        )
        .unwrap();
        // the trailing "total" lexes as FIELD thanks to the registration
        let last = tokens.last().unwrap();
        assert_eq!(last.kind, TokenKind::Field);
        assert_eq!(last.text, "total");
    }

    #[test]
    fn test_alias_registration_does_not_leak() {
        let grammar = sample_grammar();
        tokenize("group region calculate 'total' amount", &grammar).unwrap();
        // a second pass over the same shared grammar knows nothing of the alias
        let tokens = tokenize("total", &grammar).unwrap();
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_numeric_alias_is_not_registered() {
        let grammar = sample_grammar();
        let tokens = tokenize("group region calculate '42' amount 42", &grammar).unwrap();
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Value);
    }

    #[test]
    fn test_quoted_values() {
        let grammar = sample_grammar();
        let tokens = tokenize(r#"region equal to "west""#, &grammar).unwrap();
        assert_eq!(tokens[2].kind, TokenKind::Value);
        assert_eq!(tokens[2].text, r#""west""#);
    }
}
