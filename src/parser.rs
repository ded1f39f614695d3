use crate::ast::{
    Accumulator, AccumulatorOp, Assignment, ConditionChain, ContentAtom, ContentGroup,
    DeleteStatement, InsertStatement, Literal, LogicalOp, PipelineStatement, SelectStatement,
    SetClause, SingleCondition, SortDirection, Stage, Statement, Token, TokenKind,
    UpdateStatement,
};
use crate::grammar::{
    AGGREGATE_VERBS, DELETE_VERBS, GENERATE_VERBS, INSERT_VERBS, SELECT_VERBS, UPDATE_VERBS,
};

/// Errors raised while parsing the token stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The stream ended where another token was required
    UnexpectedEnd { expected: &'static str },
    /// The current token is not what the grammar requires here
    UnexpectedToken { expected: &'static str, found: Token },
    /// The leading keyword belongs to no statement kind
    UnknownVerb(String),
    /// The token stream was empty
    EmptyInput,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::UnexpectedEnd { expected } => {
                write!(f, "Unexpected end of input, expected {}", expected)
            }
            ParseError::UnexpectedToken { expected, found } => write!(
                f,
                "Expected {}, got {:?} '{}'",
                expected, found.kind, found.text
            ),
            ParseError::UnknownVerb(verb) => write!(f, "Unknown operation: '{}'", verb),
            ParseError::EmptyInput => write!(f, "No input to parse"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Recursive-descent parser over the lexer's token stream.
///
/// The leading KEYWORD's text selects one of six statement parsers; each
/// builds its typed node top-down with single-token lookahead.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, pos: 0 }
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current().map(|t| t.kind) == Some(kind)
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token, ParseError> {
        match self.current() {
            None => Err(ParseError::UnexpectedEnd { expected }),
            Some(token) if token.kind == kind => {
                let token = token.clone();
                self.advance();
                Ok(token)
            }
            Some(token) => Err(ParseError::UnexpectedToken {
                expected,
                found: token.clone(),
            }),
        }
    }

    /// Parse one complete statement, consuming the entire stream.
    pub fn parse(&mut self) -> Result<Statement, ParseError> {
        let first = self.current().ok_or(ParseError::EmptyInput)?;
        if first.kind != TokenKind::Keyword {
            return Err(ParseError::UnexpectedToken {
                expected: "a statement keyword",
                found: first.clone(),
            });
        }
        let verb = first.text.to_lowercase();
        self.advance();

        let statement = if SELECT_VERBS.contains(&verb.as_str()) {
            self.parse_select()?
        } else if INSERT_VERBS.contains(&verb.as_str()) {
            self.parse_insert()?
        } else if UPDATE_VERBS.contains(&verb.as_str()) {
            self.parse_update()?
        } else if DELETE_VERBS.contains(&verb.as_str()) {
            self.parse_delete()?
        } else if AGGREGATE_VERBS.contains(&verb.as_str()) {
            Statement::Aggregate(self.parse_pipeline()?)
        } else if GENERATE_VERBS.contains(&verb.as_str()) {
            Statement::Generate(self.parse_pipeline()?)
        } else {
            return Err(ParseError::UnknownVerb(verb));
        };

        match self.current() {
            None => Ok(statement),
            Some(trailing) => Err(ParseError::UnexpectedToken {
                expected: "end of input",
                found: trailing.clone(),
            }),
        }
    }

    fn parse_select(&mut self) -> Result<Statement, ParseError> {
        let table = self.expect(TokenKind::TableName, "a table name")?.text;
        let condition = self.parse_condition()?;
        Ok(Statement::Select(SelectStatement { table, condition }))
    }

    fn parse_delete(&mut self) -> Result<Statement, ParseError> {
        let table = self.expect(TokenKind::TableName, "a table name")?.text;
        let condition = self.parse_condition()?;
        Ok(Statement::Delete(DeleteStatement { table, condition }))
    }

    /// `Condition := SingleCondition (LogicalOperator SingleCondition)*`
    ///
    /// Strictly flat and left-to-right; `and`, `or` and `nor` carry no
    /// precedence here. Grouping is the renderers' concern.
    fn parse_condition(&mut self) -> Result<ConditionChain, ParseError> {
        let first = self.parse_single_condition()?;
        let mut rest = Vec::new();

        while self.check(TokenKind::LogicalOperator) {
            let op_token = self.expect(TokenKind::LogicalOperator, "a logical operator")?;
            let op = LogicalOp::from_keyword(&op_token.text).ok_or(ParseError::UnexpectedToken {
                expected: "'and', 'or' or 'nor'",
                found: op_token,
            })?;
            rest.push((op, self.parse_single_condition()?));
        }

        Ok(ConditionChain { first, rest })
    }

    fn parse_single_condition(&mut self) -> Result<SingleCondition, ParseError> {
        let field = self.expect(TokenKind::Field, "a field name")?.text;
        let relation = self.expect(TokenKind::Relation, "a relation")?.text;
        let value = self.expect(TokenKind::Value, "a value")?.text;
        Ok(SingleCondition {
            field,
            relation,
            value: Literal::new(value),
        })
    }

    /// Insert: one or more content groups separated by logical operators.
    /// The and/or/nor vocabulary acts purely as a record separator here.
    fn parse_insert(&mut self) -> Result<Statement, ParseError> {
        let table = self.expect(TokenKind::TableName, "a table name")?.text;
        let mut records = vec![self.parse_content_group()?];

        while self.check(TokenKind::LogicalOperator) {
            self.advance();
            records.push(self.parse_content_group()?);
        }

        Ok(Statement::Insert(InsertStatement { table, records }))
    }

    /// One record: an ordered run of field/value atom pairs.
    fn parse_content_group(&mut self) -> Result<ContentGroup, ParseError> {
        let mut atoms = Vec::new();
        loop {
            let field = self.expect(TokenKind::Field, "a field name")?.text;
            let value = self.expect(TokenKind::Value, "a value")?.text;
            atoms.push(ContentAtom {
                field,
                value: Literal::new(value),
            });
            if !self.check(TokenKind::Field) {
                break;
            }
        }
        Ok(ContentGroup { atoms })
    }

    fn parse_update(&mut self) -> Result<Statement, ParseError> {
        let table = self.expect(TokenKind::TableName, "a table name")?.text;

        let set_token = self.expect(TokenKind::Relation, "'set'")?;
        if set_token.text.to_lowercase() != "set" {
            return Err(ParseError::UnexpectedToken {
                expected: "'set'",
                found: set_token,
            });
        }

        let set = self.parse_set_clause()?;
        let condition = self.parse_condition()?;
        Ok(Statement::Update(UpdateStatement {
            table,
            set,
            condition,
        }))
    }

    /// Assignments separated by logical operators. A separator is consumed
    /// only when what follows looks like another assignment (field then an
    /// equality relation); anything else ends the clause so the condition
    /// chain can take over.
    fn parse_set_clause(&mut self) -> Result<SetClause, ParseError> {
        let mut assignments = vec![self.parse_assignment()?];

        while self.check(TokenKind::LogicalOperator) && self.peek_assignment() {
            self.advance();
            assignments.push(self.parse_assignment()?);
        }

        Ok(SetClause { assignments })
    }

    fn peek_assignment(&self) -> bool {
        let field = self.peek(1).map(|t| t.kind) == Some(TokenKind::Field);
        let equality = self.peek(2).is_some_and(|t| {
            t.kind == TokenKind::Relation && matches!(t.text.to_lowercase().as_str(), "=" | "equal to")
        });
        field && equality
    }

    fn parse_assignment(&mut self) -> Result<Assignment, ParseError> {
        let field = self.expect(TokenKind::Field, "a field name")?.text;
        let relation = self.expect(TokenKind::Relation, "'=' or 'equal to'")?;
        if !matches!(relation.text.to_lowercase().as_str(), "=" | "equal to") {
            return Err(ParseError::UnexpectedToken {
                expected: "'=' or 'equal to'",
                found: relation,
            });
        }
        let value = self.expect(TokenKind::Value, "a value")?.text;
        Ok(Assignment {
            field,
            value: Literal::new(value),
        })
    }

    /// Zero or more stages, kept in the order they appear. The same stage
    /// grammar serves the aggregate and generate forms.
    fn parse_pipeline(&mut self) -> Result<PipelineStatement, ParseError> {
        let table = self.expect(TokenKind::TableName, "a table name")?.text;
        let mut stages = Vec::new();

        while self.check(TokenKind::AggregationOperator) {
            let op = self
                .expect(TokenKind::AggregationOperator, "a pipeline stage")?
                .text
                .to_lowercase();
            let stage = match op.as_str() {
                "join" => self.parse_join_stage()?,
                "group" => self.parse_group_stage()?,
                "sort" => self.parse_sort_stage()?,
                "unwind" => Stage::Unwind {
                    field: self.expect(TokenKind::Field, "a field name")?.text,
                },
                "limit" => Stage::Limit(Literal::new(
                    self.expect(TokenKind::Value, "a value")?.text,
                )),
                "skip" => Stage::Skip(Literal::new(
                    self.expect(TokenKind::Value, "a value")?.text,
                )),
                "project" => self.parse_project_stage()?,
                _ => unreachable!("stage keywords are closed by the grammar"),
            };
            stages.push(stage);
        }

        Ok(PipelineStatement { table, stages })
    }

    fn parse_join_stage(&mut self) -> Result<Stage, ParseError> {
        let table = self.expect(TokenKind::TableName, "a table name to join")?.text;
        let local_field = self.expect(TokenKind::Field, "the local field")?.text;
        let foreign_field = self.expect(TokenKind::Field, "the foreign field")?.text;
        let alias = self.expect(TokenKind::Value, "an alias value")?;
        Ok(Stage::Join {
            table,
            local_field,
            foreign_field,
            alias: Literal::new(alias.text).unquoted().to_string(),
        })
    }

    fn parse_group_stage(&mut self) -> Result<Stage, ParseError> {
        let by = self.expect(TokenKind::Field, "the grouping field")?.text;
        let mut accumulators = Vec::new();

        while self.check(TokenKind::GroupOperator) {
            let op_token = self.expect(TokenKind::GroupOperator, "an accumulator")?;
            let op = AccumulatorOp::from_keyword(&op_token.text.to_lowercase()).ok_or(
                ParseError::UnexpectedToken {
                    expected: "'calculate', 'collect' or 'list'",
                    found: op_token,
                },
            )?;
            let alias = self.expect(TokenKind::Value, "an alias value")?;
            let field = self.expect(TokenKind::Field, "the source field")?.text;
            accumulators.push(Accumulator {
                op,
                alias: Literal::new(alias.text).unquoted().to_string(),
                field,
            });
        }

        Ok(Stage::Group { by, accumulators })
    }

    fn parse_sort_stage(&mut self) -> Result<Stage, ParseError> {
        let field = self.expect(TokenKind::Field, "a field name")?.text;
        let dir_token = self.expect(TokenKind::SortOperator, "a sort direction")?;
        let direction = SortDirection::from_keyword(&dir_token.text.to_lowercase()).ok_or(
            ParseError::UnexpectedToken {
                expected: "'increasingly' or 'decreasingly'",
                found: dir_token,
            },
        )?;
        Ok(Stage::Sort { field, direction })
    }

    fn parse_project_stage(&mut self) -> Result<Stage, ParseError> {
        let mut fields = vec![self.expect(TokenKind::Field, "a field name")?.text];
        while self.check(TokenKind::Field) {
            fields.push(self.expect(TokenKind::Field, "a field name")?.text);
        }
        Ok(Stage::Project { fields })
    }
}
