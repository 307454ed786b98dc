////////////////////////////////////////////////////////////////////
// typed values module
////////////////////////////////////////////////////////////////////

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const DECIMAL_FORMAT: &str = r"^-?\d+(\.\d+)?$";

static DECIMAL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(DECIMAL_FORMAT).expect("decimal pattern")
});

/// Basic cell value unit. Dataset cells are scalars or [`TypedValue::Null`];
/// [`TypedValue::Array`] only occurs as the value of an `in` condition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypedValue {
    Null,
    Boolean(bool),
    Number(f64),
    StringValue(String),
    Array(Vec<TypedValue>),
}

impl TypedValue {

    ////////////////////////////////////////////////////////////////////
    //      Static Methods
    ////////////////////////////////////////////////////////////////////

    /// Maps a JSON document value to a typed value; objects have no cell
    /// representation and yield `None`.
    pub fn from_json(value: &Value) -> Option<TypedValue> {
        match value {
            Value::Null => Some(TypedValue::Null),
            Value::Bool(b) => Some(TypedValue::Boolean(*b)),
            Value::Number(n) => n.as_f64().map(TypedValue::Number),
            Value::String(s) => Some(TypedValue::StringValue(s.to_string())),
            Value::Array(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(Self::from_json(item)?);
                }
                Some(TypedValue::Array(values))
            }
            Value::Object(..) => None,
        }
    }

    /// Infers a typed value from raw cell text (CSV/TSV ingestion)
    pub fn infer(text: &str) -> TypedValue {
        let text = text.trim();
        if text.is_empty() {
            return TypedValue::Null;
        }
        if text.eq_ignore_ascii_case("true") {
            return TypedValue::Boolean(true);
        }
        if text.eq_ignore_ascii_case("false") {
            return TypedValue::Boolean(false);
        }
        if DECIMAL_REGEX.is_match(text) {
            if let Ok(number) = text.parse::<f64>() {
                return TypedValue::Number(number);
            }
        }
        TypedValue::StringValue(text.to_string())
    }

    ////////////////////////////////////////////////////////////////////
    //      Instance Methods
    ////////////////////////////////////////////////////////////////////

    pub fn is_null(&self) -> bool {
        matches!(self, TypedValue::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TypedValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Type-aware equality; null matches nothing, itself included.
    pub fn matches(&self, other: &TypedValue) -> bool {
        match (self, other) {
            (TypedValue::Null, _) | (_, TypedValue::Null) => false,
            (TypedValue::Boolean(a), TypedValue::Boolean(b)) => a == b,
            (TypedValue::Number(a), TypedValue::Number(b)) => a == b,
            (TypedValue::StringValue(a), TypedValue::StringValue(b)) => a == b,
            (TypedValue::Array(a), TypedValue::Array(b)) =>
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.matches(y)),
            _ => false,
        }
    }

    /// Total ordering used by multi-key sorting: values order within their
    /// own type; across types the rank is Number < String < Boolean < Array,
    /// with null ranked after everything.
    pub fn compare(&self, other: &TypedValue) -> Ordering {
        match (self, other) {
            (TypedValue::Null, TypedValue::Null) => Ordering::Equal,
            (TypedValue::Null, _) => Ordering::Greater,
            (_, TypedValue::Null) => Ordering::Less,
            (TypedValue::Number(a), TypedValue::Number(b)) =>
                a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (TypedValue::StringValue(a), TypedValue::StringValue(b)) => a.cmp(b),
            (TypedValue::Boolean(a), TypedValue::Boolean(b)) => a.cmp(b),
            (a, b) => a.type_rank().cmp(&b.type_rank()),
        }
    }

    pub fn get_type_name(&self) -> &'static str {
        match self {
            TypedValue::Null => "Null",
            TypedValue::Boolean(..) => "Boolean",
            TypedValue::Number(..) => "Number",
            TypedValue::StringValue(..) => "String",
            TypedValue::Array(..) => "Array",
        }
    }

    fn type_rank(&self) -> u8 {
        match self {
            TypedValue::Number(..) => 0,
            TypedValue::StringValue(..) => 1,
            TypedValue::Boolean(..) => 2,
            TypedValue::Array(..) => 3,
            TypedValue::Null => 4,
        }
    }
}

impl Display for TypedValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TypedValue::Null => write!(f, "null"),
            TypedValue::Boolean(b) => write!(f, "{b}"),
            TypedValue::Number(n) => write!(f, "{n}"),
            TypedValue::StringValue(s) => write!(f, "{s}"),
            TypedValue::Array(items) =>
                write!(f, "[{}]", items.iter().map(|v| v.to_string()).join(", ")),
        }
    }
}

// Unit tests
#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use crate::typed_values::TypedValue;
    use crate::typed_values::TypedValue::{Array, Boolean, Null, Number, StringValue};

    #[test]
    fn test_infer_number() {
        assert_eq!(TypedValue::infer("42"), Number(42.));
        assert_eq!(TypedValue::infer("-3.25"), Number(-3.25));
    }

    #[test]
    fn test_infer_boolean() {
        assert_eq!(TypedValue::infer("true"), Boolean(true));
        assert_eq!(TypedValue::infer("FALSE"), Boolean(false));
    }

    #[test]
    fn test_infer_null_and_text() {
        assert_eq!(TypedValue::infer(""), Null);
        assert_eq!(TypedValue::infer("  "), Null);
        assert_eq!(TypedValue::infer("4.5x"), StringValue("4.5x".into()));
    }

    #[test]
    fn test_null_matches_nothing() {
        assert!(!Null.matches(&Null));
        assert!(!Null.matches(&Number(1.)));
        assert!(!StringValue("A".into()).matches(&Null));
    }

    #[test]
    fn test_matches_is_type_aware() {
        assert!(Number(10.).matches(&Number(10.)));
        assert!(!Number(10.).matches(&StringValue("10".into())));
        assert!(StringValue("A".into()).matches(&StringValue("A".into())));
    }

    #[test]
    fn test_compare_orders_nulls_last() {
        assert_eq!(Null.compare(&Number(1e9)), Ordering::Greater);
        assert_eq!(StringValue("z".into()).compare(&Null), Ordering::Less);
    }

    #[test]
    fn test_display() {
        assert_eq!(Number(40.).to_string(), "40");
        assert_eq!(Number(40.5).to_string(), "40.5");
        assert_eq!(StringValue("NYSE".into()).to_string(), "NYSE");
        assert_eq!(Array(vec![StringValue("A".into()), Number(2.)]).to_string(), "[A, 2]");
    }
}
