use crate::ast::conditions::{ConditionChain, Literal};
use crate::ast::pipeline::Stage;

/// A parsed statement. The verb at the start of the query selects the
/// variant; every variant carries its full, typed substructure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Select(SelectStatement),
    Insert(InsertStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
    /// Document-dialect pipeline (`aggregate ...`)
    Aggregate(PipelineStatement),
    /// Relational-dialect pipeline (`generate ...`)
    Generate(PipelineStatement),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectStatement {
    pub table: String,
    pub condition: ConditionChain,
}

/// `insert into <table> <field> <value>... [and <field> <value>...]...`
///
/// Logical operators separate records here; they carry no boolean meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertStatement {
    pub table: String,
    pub records: Vec<ContentGroup>,
}

/// One record: an ordered run of field/value atoms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentGroup {
    pub atoms: Vec<ContentAtom>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentAtom {
    pub field: String,
    pub value: Literal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStatement {
    pub table: String,
    pub set: SetClause,
    pub condition: ConditionChain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetClause {
    pub assignments: Vec<Assignment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub field: String,
    pub value: Literal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteStatement {
    pub table: String,
    pub condition: ConditionChain,
}

/// A pipeline over one table: stages kept in the order they were written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineStatement {
    pub table: String,
    pub stages: Vec<Stage>,
}
