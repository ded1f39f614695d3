//! Tokens and the typed abstract syntax tree.
//!
//! The AST is a closed set of tagged variants: every statement kind and
//! substructure is its own type, so the semantic analyzer and both code
//! generators match exhaustively and a new statement kind cannot be missed
//! anywhere.
//!
//! Submodules:
//!
//! - **[tokens]** - lexical tokens produced by the lexer
//! - **[conditions]** - literals, relations and flat condition chains
//! - **[statements]** - the six statement kinds
//! - **[pipeline]** - pipeline stages shared by the aggregate and generate
//!   forms
//!
//! Nodes form a tree, not a graph: the parser builds them, the semantic
//! analyzer and code generators read them, nothing mutates them.

pub mod conditions;
pub mod pipeline;
pub mod statements;
pub mod tokens;

pub use conditions::{ConditionChain, Literal, LogicalOp, SingleCondition};
pub use pipeline::{Accumulator, AccumulatorOp, SortDirection, Stage};
pub use statements::{
    Assignment, ContentAtom, ContentGroup, DeleteStatement, InsertStatement, PipelineStatement,
    SelectStatement, SetClause, Statement, UpdateStatement,
};
pub use tokens::{Token, TokenKind};
