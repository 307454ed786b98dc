////////////////////////////////////////////////////////////////////
// query engine module
////////////////////////////////////////////////////////////////////

use std::cmp::Ordering;

use itertools::Itertools;

use crate::columns::Column;
use crate::dataframes::DataFrame;
use crate::errors::Errors;
use crate::errors::Errors::{InvalidOperatorUsage, NonNumericAggregate, TypeMismatch, UnknownColumn};
use crate::plans::{AggregateFunction, Calculation, Condition, ConditionOperator, Operation, QueryPlan, SortDirection, SortKey};
use crate::typed_values::TypedValue;

/// Insertion-ordered mapping from aggregate keys (`Price_sum`) to results.
/// Re-inserting an existing key updates the value in place without moving it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AggregateMap {
    entries: Vec<(String, f64)>,
}

impl AggregateMap {
    pub fn new() -> AggregateMap {
        AggregateMap { entries: Vec::new() }
    }

    pub fn insert(&mut self, key: String, value: f64) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, f64)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The outcome of a fully applied plan
#[derive(Clone, Debug, PartialEq)]
pub struct ExecutionResult {
    pub table: DataFrame,
    pub trace: Vec<String>,
    pub aggregates: AggregateMap,
}

/// Applies the plan's operations in order against a scratch copy of the
/// table. Column names are validated just-in-time against the table state
/// each operation actually sees, so an earlier `select` can make a later
/// column reference invalid. Any failure aborts the whole plan; the input
/// table is never modified.
pub fn execute(plan: &QueryPlan, table: &DataFrame) -> Result<ExecutionResult, Errors> {
    let mut table = table.to_owned();
    let mut trace: Vec<String> = Vec::new();
    let mut aggregates = AggregateMap::new();
    for operation in &plan.operations {
        match operation {
            Operation::Filter { conditions } =>
                table = do_filter(&table, conditions, &mut trace)?,
            Operation::Sort { columns } =>
                table = do_sort(&table, columns, &mut trace)?,
            Operation::Select { columns } =>
                table = do_select(&table, columns, &mut trace)?,
            Operation::Aggregate { calculations } =>
                do_aggregate(&table, calculations, &mut aggregates, &mut trace)?,
        }
    }
    if trace.is_empty() {
        trace.push("No operations applied.".to_string());
    }
    Ok(ExecutionResult { table, trace, aggregates })
}

/// Applies one filter operation; its conditions narrow the row set
/// sequentially and are reported as a single trace line.
fn do_filter(
    table: &DataFrame,
    conditions: &Vec<Condition>,
    trace: &mut Vec<String>,
) -> Result<DataFrame, Errors> {
    let mut filtered = table.to_owned();
    for condition in conditions {
        filtered = apply_condition(&filtered, condition)?;
    }
    trace.push(format!("Filtered by: {}",
                       conditions.iter().map(|c| c.to_string()).join(" and ")));
    Ok(filtered)
}

fn apply_condition(table: &DataFrame, condition: &Condition) -> Result<DataFrame, Errors> {
    let column = table.get_column(&condition.column)
        .ok_or_else(|| UnknownColumn(condition.column.to_string()))?;
    let mask = match condition.operator {
        ConditionOperator::Equal =>
            column.get_values().iter()
                .map(|cell| cell.matches(&condition.value))
                .collect::<Vec<bool>>(),
        ConditionOperator::NotEqual =>
            // null cells count as different from any comparison value
            column.get_values().iter()
                .map(|cell| !cell.matches(&condition.value))
                .collect::<Vec<bool>>(),
        ConditionOperator::In => {
            let choices = match &condition.value {
                TypedValue::Array(items) => items,
                other => return Err(InvalidOperatorUsage(format!(
                    "operator 'in' requires a list of values, found {}",
                    other.get_type_name()))),
            };
            column.get_values().iter()
                .map(|cell| choices.iter().any(|choice| cell.matches(choice)))
                .collect::<Vec<bool>>()
        }
        ConditionOperator::GreaterThan | ConditionOperator::LessThan =>
            numeric_mask(column, condition)?,
    };
    Ok(table.filter_rows(&mask))
}

/// Builds the row mask for an ordering comparison; non-numeric data on
/// either side is a hard failure, never a silent coercion.
fn numeric_mask(column: &Column, condition: &Condition) -> Result<Vec<bool>, Errors> {
    let target = condition.value.as_f64()
        .ok_or_else(|| TypeMismatch(
            condition.column.to_string(),
            condition.value.get_type_name().to_string()))?;
    let mut mask = Vec::with_capacity(column.len());
    for cell in column.get_values() {
        let keep = match cell {
            TypedValue::Null => false,
            TypedValue::Number(n) => match condition.operator {
                ConditionOperator::GreaterThan => *n > target,
                _ => *n < target,
            },
            other => return Err(TypeMismatch(
                condition.column.to_string(),
                other.get_type_name().to_string())),
        };
        mask.push(keep);
    }
    Ok(mask)
}

/// Stable multi-key sort; `desc` reverses the comparison for that key only,
/// and null cells order last under both directions.
fn do_sort(
    table: &DataFrame,
    keys: &Vec<SortKey>,
    trace: &mut Vec<String>,
) -> Result<DataFrame, Errors> {
    let sort_columns = keys.iter()
        .map(|key| table.get_column(&key.column)
            .map(|column| (column, key.direction))
            .ok_or_else(|| UnknownColumn(key.column.to_string())))
        .collect::<Result<Vec<(&Column, SortDirection)>, Errors>>()?;
    let mut row_ids: Vec<usize> = (0..table.len()).collect();
    row_ids.sort_by(|a, b| {
        for (column, direction) in &sort_columns {
            let (va, vb) = (column.get_value(*a), column.get_value(*b));
            let ordering = match (va.is_null(), vb.is_null()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => match direction {
                    SortDirection::Ascending => va.compare(vb),
                    SortDirection::Descending => vb.compare(va),
                },
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
    trace.push(format!("Sorted by: {}",
                       keys.iter().map(|k| k.to_string()).join(", ")));
    Ok(table.take_rows(&row_ids))
}

/// Projects and reorders columns to exactly the listed names
fn do_select(
    table: &DataFrame,
    names: &Vec<String>,
    trace: &mut Vec<String>,
) -> Result<DataFrame, Errors> {
    let columns = names.iter()
        .map(|name| table.get_column(name)
            .map(|column| column.to_owned())
            .ok_or_else(|| UnknownColumn(name.to_string())))
        .collect::<Result<Vec<Column>, Errors>>()?;
    trace.push(format!("Selected columns: {}", names.iter().join(", ")));
    Ok(DataFrame::from_columns(columns))
}

/// Computes aggregate calculations over the current row set, skipping null
/// cells; results accumulate into the plan-wide aggregate map and the trace
/// line reports the cumulative map.
fn do_aggregate(
    table: &DataFrame,
    calculations: &Vec<Calculation>,
    aggregates: &mut AggregateMap,
    trace: &mut Vec<String>,
) -> Result<(), Errors> {
    for calc in calculations {
        let column = table.get_column(&calc.column)
            .ok_or_else(|| UnknownColumn(calc.column.to_string()))?;
        let mut values: Vec<f64> = Vec::with_capacity(column.len());
        for cell in column.get_values() {
            match cell {
                TypedValue::Null => {}
                TypedValue::Number(n) => values.push(*n),
                _ => return Err(NonNumericAggregate(calc.column.to_string())),
            }
        }
        let result = match calc.function {
            AggregateFunction::Average =>
                if values.is_empty() { f64::NAN } else {
                    values.iter().sum::<f64>() / values.len() as f64
                },
            AggregateFunction::Sum => values.iter().sum(),
            AggregateFunction::Max => values.iter().copied().fold(f64::NAN, f64::max),
            AggregateFunction::Min => values.iter().copied().fold(f64::NAN, f64::min),
        };
        aggregates.insert(format!("{}_{}", calc.column, calc.function.get_suffix()), result);
    }
    trace.push(format!("Aggregates: {}",
                       aggregates.iter().map(|(k, v)| format!("{k}: {v}")).join(", ")));
    Ok(())
}
