//! Document renderer: MongoDB-style call and pipeline expressions.
//!
//! Keys are emitted unquoted and string values double-quoted, shell-style
//! rather than strict JSON.

use crate::ast::{
    ConditionChain, ContentGroup, InsertStatement, Literal, PipelineStatement, SingleCondition,
    Stage, Statement, UpdateStatement,
};
use crate::codegen::{mongo_operator, GenError};

pub fn render(statement: &Statement) -> Result<String, GenError> {
    match statement {
        Statement::Select(select) => Ok(format!(
            "db.{}.find({});",
            select.table,
            fold_chain(&select.condition)
        )),
        Statement::Insert(insert) => render_insert(insert),
        Statement::Update(update) => render_update(update),
        Statement::Delete(delete) => Ok(format!(
            "db.{}.deleteMany({});",
            delete.table,
            fold_chain(&delete.condition)
        )),
        // Either pipeline form renders as an aggregation array when the
        // target is the document store
        Statement::Aggregate(pipeline) | Statement::Generate(pipeline) => render_pipeline(pipeline),
    }
}

/// Re-nest the flat chain into the boolean-operator algebra by a left
/// fold: combine the previous result with the next condition under the
/// operator, strictly left-associative and non-flattening: three
/// conditions joined by one operator nest two deep rather than merging
/// into a single array.
fn fold_chain(chain: &ConditionChain) -> String {
    let mut folded = render_condition(&chain.first);
    for (op, condition) in &chain.rest {
        folded = format!(
            "{{{}: [{}, {}]}}",
            op.mongo(),
            folded,
            render_condition(condition)
        );
    }
    folded
}

fn render_condition(condition: &SingleCondition) -> String {
    format!(
        "{{{}: {{{}: {}}}}}",
        condition.field,
        mongo_operator(&condition.relation),
        render_value(&condition.value)
    )
}

/// Numbers stay bare; quoted text is normalized to double quotes; anything
/// else passes through as scanned.
fn render_value(value: &Literal) -> String {
    if value.is_numeric() {
        value.text.clone()
    } else if value.is_quoted() {
        format!("\"{}\"", value.unquoted())
    } else {
        value.text.clone()
    }
}

fn render_document(record: &ContentGroup) -> Result<String, GenError> {
    if record.atoms.is_empty() {
        return Err(GenError::EmptyRecord);
    }
    let pairs: Vec<String> = record
        .atoms
        .iter()
        .map(|atom| format!("{}: {}", atom.field, render_value(&atom.value)))
        .collect();
    Ok(format!("{{{}}}", pairs.join(", ")))
}

/// `insertOne` for a single record, `insertMany` for several.
fn render_insert(insert: &InsertStatement) -> Result<String, GenError> {
    match insert.records.as_slice() {
        [] => Err(GenError::MissingRecords),
        [record] => Ok(format!(
            "db.{}.insertOne({});",
            insert.table,
            render_document(record)?
        )),
        records => {
            let documents: Vec<String> = records
                .iter()
                .map(render_document)
                .collect::<Result<_, _>>()?;
            Ok(format!(
                "db.{}.insertMany([{}]);",
                insert.table,
                documents.join(", ")
            ))
        }
    }
}

fn render_update(update: &UpdateStatement) -> Result<String, GenError> {
    if update.set.assignments.is_empty() {
        return Err(GenError::MissingSetClause);
    }
    let pairs: Vec<String> = update
        .set
        .assignments
        .iter()
        .map(|a| format!("{}: {}", a.field, render_value(&a.value)))
        .collect();

    Ok(format!(
        "db.{}.updateMany({}, {{$set: {{{}}}}});",
        update.table,
        fold_chain(&update.condition),
        pairs.join(", ")
    ))
}

/// An ordered array of stage documents, one per stage, in input order.
fn render_pipeline(pipeline: &PipelineStatement) -> Result<String, GenError> {
    let stages: Vec<String> = pipeline.stages.iter().map(render_stage).collect();
    Ok(format!(
        "db.{}.aggregate([{}]);",
        pipeline.table,
        stages.join(", ")
    ))
}

fn render_stage(stage: &Stage) -> String {
    match stage {
        Stage::Join {
            table,
            local_field,
            foreign_field,
            alias,
        } => format!(
            "{{$lookup: {{from: \"{}\", localField: \"{}\", foreignField: \"{}\", as: \"{}\"}}}}",
            table, local_field, foreign_field, alias
        ),
        Stage::Group { by, accumulators } => {
            let mut pairs = vec![format!("_id: \"${}\"", by)];
            for acc in accumulators {
                pairs.push(format!(
                    "{}: {{{}: \"${}\"}}",
                    acc.alias,
                    acc.op.mongo(),
                    acc.field
                ));
            }
            format!("{{$group: {{{}}}}}", pairs.join(", "))
        }
        Stage::Sort { field, direction } => {
            format!("{{$sort: {{{}: {}}}}}", field, direction.mongo())
        }
        Stage::Unwind { field } => format!("{{$unwind: \"${}\"}}", field),
        Stage::Limit(value) => format!("{{$limit: {}}}", value.text),
        Stage::Skip(value) => format!("{{$skip: {}}}", value.text),
        Stage::Project { fields } => {
            let pairs: Vec<String> = fields.iter().map(|f| format!("{}: 1", f)).collect();
            format!("{{$project: {{{}}}}}", pairs.join(", "))
        }
    }
}
