////////////////////////////////////////////////////////////////////
// errors module
////////////////////////////////////////////////////////////////////

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Represents a plan-processing error. Every variant is recoverable at the
/// session boundary: failures become diagnostic text, never panics.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum Errors {
    NoJsonFound,
    MalformedJson(String),
    UnknownColumn(String),
    InvalidOperatorUsage(String),
    UnsupportedOperator(String),
    UnsupportedFunction(String),
    TypeMismatch(String, String),
    NonNumericAggregate(String),
    NoDataLoaded,
}

impl Display for Errors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Errors::NoJsonFound =>
                "No valid JSON found in model output.".to_string(),
            Errors::MalformedJson(detail) =>
                format!("Malformed JSON: {detail}"),
            Errors::UnknownColumn(name) =>
                format!("Column '{name}' not found in table."),
            Errors::InvalidOperatorUsage(detail) =>
                format!("Invalid operator usage: {detail}"),
            Errors::UnsupportedOperator(name) =>
                format!("Unsupported operator: {name}"),
            Errors::UnsupportedFunction(name) =>
                format!("Unsupported function: {name}"),
            Errors::TypeMismatch(column, found) =>
                format!("Column '{column}' is not numeric; found {found}."),
            Errors::NonNumericAggregate(column) =>
                format!("Cannot aggregate non-numeric column '{column}'."),
            Errors::NoDataLoaded =>
                "No data loaded.".to_string(),
        };
        write!(f, "{text}")
    }
}

impl std::error::Error for Errors {}

/// Produces an `io::Result` failure from a message
pub fn fail<A>(message: impl Into<String>) -> std::io::Result<A> {
    Err(std::io::Error::new(std::io::ErrorKind::Other, message.into()))
}
