////////////////////////////////////////////////////////////////////
// query plans module
////////////////////////////////////////////////////////////////////

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::Errors;
use crate::errors::Errors::{MalformedJson, UnsupportedFunction, UnsupportedOperator};
use crate::typed_values::TypedValue;

/// An ordered sequence of operations; operations apply left to right, each
/// seeing the output of the previous.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryPlan {
    pub operations: Vec<Operation>,
}

impl QueryPlan {
    pub fn new(operations: Vec<Operation>) -> QueryPlan {
        QueryPlan { operations }
    }

    /// Maps a decoded JSON document into a plan. A document without an
    /// `"operations"` key is a valid zero-op plan. Names outside the closed
    /// operator/function/direction vocabularies are rejected here; column
    /// names are validated later, against the live table.
    pub fn from_json(doc: &Value) -> Result<QueryPlan, Errors> {
        let doc = expect_object(doc, "plan")?;
        let operations = match doc.get("operations") {
            None => Vec::new(),
            Some(ops) => expect_array(ops, "\"operations\"")?
                .iter()
                .map(Operation::from_json)
                .collect::<Result<Vec<Operation>, Errors>>()?,
        };
        Ok(QueryPlan::new(operations))
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// A single plan step
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Operation {
    Filter { conditions: Vec<Condition> },
    Sort { columns: Vec<SortKey> },
    Select { columns: Vec<String> },
    Aggregate { calculations: Vec<Calculation> },
}

impl Operation {
    fn from_json(op: &Value) -> Result<Operation, Errors> {
        let op = expect_object(op, "operation")?;
        let kind = get_string(op, "type", "operation")?;
        match kind.as_str() {
            "filter" => Ok(Operation::Filter {
                conditions: get_items(op, "conditions", Condition::from_json)?,
            }),
            "sort" => Ok(Operation::Sort {
                columns: get_items(op, "columns", SortKey::from_json)?,
            }),
            "select" => Ok(Operation::Select {
                columns: get_items(op, "columns", |v| match v {
                    Value::String(s) => Ok(s.to_string()),
                    other => Err(MalformedJson(format!(
                        "\"select\" column is not a string: {other}"))),
                })?,
            }),
            "aggregate" => Ok(Operation::Aggregate {
                calculations: get_items(op, "calculations", Calculation::from_json)?,
            }),
            other => Err(UnsupportedOperator(other.to_string())),
        }
    }
}

/// A filter condition; conditions within one filter narrow sequentially
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub column: String,
    pub operator: ConditionOperator,
    pub value: TypedValue,
}

impl Condition {
    fn from_json(cond: &Value) -> Result<Condition, Errors> {
        let cond = expect_object(cond, "condition")?;
        let value = cond.get("value")
            .ok_or_else(|| MalformedJson("condition is missing \"value\"".into()))?;
        let value = TypedValue::from_json(value)
            .ok_or_else(|| MalformedJson(format!(
                "condition value is not a scalar or array: {value}")))?;
        Ok(Condition {
            column: get_string(cond, "column", "condition")?,
            operator: ConditionOperator::compile(&get_string(cond, "operator", "condition")?)?,
            value,
        })
    }
}

impl Display for Condition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.column, self.operator, self.value)
    }
}

/// The closed condition operator vocabulary
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ConditionOperator {
    Equal,
    NotEqual,
    GreaterThan,
    LessThan,
    In,
}

impl ConditionOperator {
    /// Compiles an operator name; anything outside the vocabulary fails
    pub fn compile(name: &str) -> Result<ConditionOperator, Errors> {
        match name {
            "==" => Ok(ConditionOperator::Equal),
            "!=" => Ok(ConditionOperator::NotEqual),
            ">" => Ok(ConditionOperator::GreaterThan),
            "<" => Ok(ConditionOperator::LessThan),
            "in" => Ok(ConditionOperator::In),
            other => Err(UnsupportedOperator(other.to_string())),
        }
    }
}

impl Display for ConditionOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            ConditionOperator::Equal => "==",
            ConditionOperator::NotEqual => "!=",
            ConditionOperator::GreaterThan => ">",
            ConditionOperator::LessThan => "<",
            ConditionOperator::In => "in",
        };
        write!(f, "{symbol}")
    }
}

/// One key of a multi-key sort
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: String,
    pub direction: SortDirection,
}

impl SortKey {
    fn from_json(key: &Value) -> Result<SortKey, Errors> {
        let key = expect_object(key, "sort column")?;
        Ok(SortKey {
            column: get_string(key, "column", "sort column")?,
            direction: SortDirection::compile(&get_string(key, "direction", "sort column")?)?,
        })
    }
}

impl Display for SortKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.column, self.direction)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn compile(name: &str) -> Result<SortDirection, Errors> {
        match name {
            "asc" => Ok(SortDirection::Ascending),
            "desc" => Ok(SortDirection::Descending),
            other => Err(UnsupportedOperator(other.to_string())),
        }
    }
}

impl Display for SortDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "asc"),
            SortDirection::Descending => write!(f, "desc"),
        }
    }
}

/// One aggregate calculation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Calculation {
    pub function: AggregateFunction,
    pub column: String,
}

impl Calculation {
    fn from_json(calc: &Value) -> Result<Calculation, Errors> {
        let calc = expect_object(calc, "calculation")?;
        Ok(Calculation {
            function: AggregateFunction::compile(&get_string(calc, "function", "calculation")?)?,
            column: get_string(calc, "column", "calculation")?,
        })
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum AggregateFunction {
    Average,
    Sum,
    Max,
    Min,
}

impl AggregateFunction {
    pub fn compile(name: &str) -> Result<AggregateFunction, Errors> {
        match name {
            "average" => Ok(AggregateFunction::Average),
            "sum" => Ok(AggregateFunction::Sum),
            "max" => Ok(AggregateFunction::Max),
            "min" => Ok(AggregateFunction::Min),
            other => Err(UnsupportedFunction(other.to_string())),
        }
    }

    /// Returns the suffix used in aggregate result keys (`Price_avg`)
    pub fn get_suffix(&self) -> &'static str {
        match self {
            AggregateFunction::Average => "avg",
            AggregateFunction::Sum => "sum",
            AggregateFunction::Max => "max",
            AggregateFunction::Min => "min",
        }
    }
}

////////////////////////////////////////////////////////////////////
//      document helpers
////////////////////////////////////////////////////////////////////

fn expect_object<'a>(value: &'a Value, what: &str) -> Result<&'a Map<String, Value>, Errors> {
    value.as_object()
        .ok_or_else(|| MalformedJson(format!("{what} is not an object: {value}")))
}

fn expect_array<'a>(value: &'a Value, what: &str) -> Result<&'a Vec<Value>, Errors> {
    value.as_array()
        .ok_or_else(|| MalformedJson(format!("{what} is not an array: {value}")))
}

fn get_string(obj: &Map<String, Value>, key: &str, what: &str) -> Result<String, Errors> {
    match obj.get(key) {
        Some(Value::String(s)) => Ok(s.to_string()),
        Some(other) => Err(MalformedJson(format!("{what} \"{key}\" is not a string: {other}"))),
        None => Err(MalformedJson(format!("{what} is missing \"{key}\""))),
    }
}

/// Decodes an optional array attribute item by item; a missing attribute is
/// an empty list, as in the source document contract.
fn get_items<A>(
    obj: &Map<String, Value>,
    key: &str,
    decode: fn(&Value) -> Result<A, Errors>,
) -> Result<Vec<A>, Errors> {
    match obj.get(key) {
        None => Ok(Vec::new()),
        Some(items) => expect_array(items, key)?.iter().map(decode).collect(),
    }
}
