//! Relational renderer: SQL statement text.

use crate::ast::{
    AccumulatorOp, ConditionChain, InsertStatement, PipelineStatement, SingleCondition, Stage,
    Statement, UpdateStatement,
};
use crate::codegen::{sql_operator, GenError};

pub fn render(statement: &Statement) -> Result<String, GenError> {
    match statement {
        Statement::Select(select) => Ok(format!(
            "SELECT * FROM {} WHERE {};",
            select.table,
            render_chain(&select.condition)
        )),
        Statement::Insert(insert) => render_insert(insert),
        Statement::Update(update) => render_update(update),
        Statement::Delete(delete) => Ok(format!(
            "DELETE FROM {} WHERE {};",
            delete.table,
            render_chain(&delete.condition)
        )),
        // Either pipeline form renders as clause fragments when the target
        // is relational
        Statement::Aggregate(pipeline) | Statement::Generate(pipeline) => render_pipeline(pipeline),
    }
}

/// Flat rendering: each condition joined by its uppercased logical keyword,
/// left to right, with no added grouping.
fn render_chain(chain: &ConditionChain) -> String {
    let mut out = render_condition(&chain.first);
    for (op, condition) in &chain.rest {
        out.push(' ');
        out.push_str(op.sql());
        out.push(' ');
        out.push_str(&render_condition(condition));
    }
    out
}

fn render_condition(condition: &SingleCondition) -> String {
    format!(
        "{} {} {}",
        condition.field,
        sql_operator(&condition.relation),
        condition.value.text
    )
}

fn render_insert(insert: &InsertStatement) -> Result<String, GenError> {
    let first = insert.records.first().ok_or(GenError::MissingRecords)?;
    if first.atoms.is_empty() {
        return Err(GenError::EmptyRecord);
    }

    let fields: Vec<&str> = first.atoms.iter().map(|a| a.field.as_str()).collect();
    let mut rows = Vec::with_capacity(insert.records.len());
    for record in &insert.records {
        if record.atoms.is_empty() {
            return Err(GenError::EmptyRecord);
        }
        let values: Vec<&str> = record.atoms.iter().map(|a| a.value.text.as_str()).collect();
        rows.push(format!("({})", values.join(", ")));
    }

    Ok(format!(
        "INSERT INTO {} ({}) VALUES {};",
        insert.table,
        fields.join(", "),
        rows.join(", ")
    ))
}

fn render_update(update: &UpdateStatement) -> Result<String, GenError> {
    if update.set.assignments.is_empty() {
        return Err(GenError::MissingSetClause);
    }
    let assignments: Vec<String> = update
        .set
        .assignments
        .iter()
        .map(|a| format!("{} = {}", a.field, a.value.text))
        .collect();

    Ok(format!(
        "UPDATE {} SET {} WHERE {};",
        update.table,
        assignments.join(", "),
        render_chain(&update.condition)
    ))
}

/// Assemble clause fragments in the fixed order FROM, JOIN*, GROUP BY,
/// ORDER BY, LIMIT, OFFSET, then prefix the SELECT column list built from
/// the project fields and group accumulators.
fn render_pipeline(pipeline: &PipelineStatement) -> Result<String, GenError> {
    let mut joins: Vec<String> = Vec::new();
    let mut group_by: Vec<&str> = Vec::new();
    let mut accumulator_columns: Vec<String> = Vec::new();
    let mut order_by: Vec<String> = Vec::new();
    let mut limit: Option<&str> = None;
    let mut skip: Option<&str> = None;
    let mut projected: Vec<&str> = Vec::new();

    for stage in &pipeline.stages {
        match stage {
            Stage::Join {
                table,
                local_field,
                foreign_field,
                alias,
            } => joins.push(format!(
                " JOIN {} AS {} ON {}.{} = {}.{}",
                table, alias, pipeline.table, local_field, alias, foreign_field
            )),
            Stage::Group { by, accumulators } => {
                group_by.push(by);
                for acc in accumulators {
                    let expr = match acc.op {
                        AccumulatorOp::Sum => format!("SUM({})", acc.field),
                        AccumulatorOp::Push => format!("GROUP_CONCAT({})", acc.field),
                        AccumulatorOp::AddToSet => format!("GROUP_CONCAT(DISTINCT {})", acc.field),
                    };
                    accumulator_columns.push(format!("{} AS {}", expr, acc.alias));
                }
            }
            Stage::Sort { field, direction } => {
                order_by.push(format!("{} {}", field, direction.sql()));
            }
            // No relational counterpart; the document renderer owns this one
            Stage::Unwind { .. } => {}
            Stage::Limit(value) => limit = Some(&value.text),
            Stage::Skip(value) => skip = Some(&value.text),
            Stage::Project { fields } => projected.extend(fields.iter().map(|f| f.as_str())),
        }
    }

    let mut columns: Vec<String> = projected.iter().map(|f| f.to_string()).collect();
    columns.extend(accumulator_columns);
    let column_list = if columns.is_empty() {
        "*".to_string()
    } else {
        columns.join(", ")
    };

    let mut query = format!("SELECT {} FROM {}", column_list, pipeline.table);
    for join in &joins {
        query.push_str(join);
    }
    if !group_by.is_empty() {
        query.push_str(" GROUP BY ");
        query.push_str(&group_by.join(", "));
    }
    if !order_by.is_empty() {
        query.push_str(" ORDER BY ");
        query.push_str(&order_by.join(", "));
    }
    if let Some(n) = limit {
        query.push_str(" LIMIT ");
        query.push_str(n);
    }
    if let Some(n) = skip {
        query.push_str(" OFFSET ");
        query.push_str(n);
    }
    query.push(';');
    Ok(query)
}
