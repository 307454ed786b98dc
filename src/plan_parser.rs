////////////////////////////////////////////////////////////////////
// plan parser module
////////////////////////////////////////////////////////////////////

use serde_json::Value;

use crate::errors::Errors;
use crate::errors::Errors::{MalformedJson, NoJsonFound};
use crate::plans::QueryPlan;

/// Parses a query plan out of arbitrary generator output: locates the
/// embedded JSON object, decodes it and maps it into a [`QueryPlan`].
pub fn parse(raw_text: &str) -> Result<QueryPlan, Errors> {
    let fragment = extract_json(raw_text)?;
    let doc = decode_document(fragment)?;
    QueryPlan::from_json(&doc)
}

/// Locates the first `{` and its matching balanced `}` in the text,
/// tracking string literals and escapes. The generator is not guaranteed
/// to emit pure JSON; leading commentary and trailing noise are ignored.
pub fn extract_json(raw_text: &str) -> Result<&str, Errors> {
    let start = match raw_text.find('{') {
        Some(n) => n,
        None => return Err(NoJsonFound),
    };
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (n, c) in raw_text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
        } else {
            match c {
                '"' => in_string = true,
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(&raw_text[start..start + n + c.len_utf8()]);
                    }
                }
                _ => {}
            }
        }
    }
    Err(NoJsonFound)
}

/// Decodes the located JSON fragment into a document
pub fn decode_document(fragment: &str) -> Result<Value, Errors> {
    serde_json::from_str(fragment).map_err(|e| MalformedJson(e.to_string()))
}

// Unit tests
#[cfg(test)]
mod tests {
    use crate::errors::Errors::{MalformedJson, NoJsonFound, UnsupportedOperator};
    use crate::plan_parser::{extract_json, parse};
    use crate::plans::{Condition, ConditionOperator, Operation, QueryPlan};
    use crate::typed_values::TypedValue::StringValue;

    fn sample_plan() -> QueryPlan {
        QueryPlan::new(vec![Operation::Filter {
            conditions: vec![Condition {
                column: "Category".into(),
                operator: ConditionOperator::Equal,
                value: StringValue("A".into()),
            }]
        }])
    }

    const SAMPLE_JSON: &str =
        r#"{"operations":[{"type":"filter","conditions":[{"column":"Category","operator":"==","value":"A"}]}]}"#;

    #[test]
    fn test_parse_pure_json() {
        assert_eq!(parse(SAMPLE_JSON), Ok(sample_plan()));
    }

    #[test]
    fn test_parse_recovers_plan_from_noise() {
        let raw = format!("Sure! Here is the plan you asked for:\n{SAMPLE_JSON}\nLet me know if you need more.");
        assert_eq!(parse(&raw), Ok(sample_plan()));
    }

    #[test]
    fn test_parse_empty_object_is_empty_plan() {
        assert_eq!(parse("some preamble {} trailer"), Ok(QueryPlan::default()));
    }

    #[test]
    fn test_no_json_found() {
        assert_eq!(parse("no braces here at all"), Err(NoJsonFound));
        assert_eq!(parse("opened { but never closed"), Err(NoJsonFound));
    }

    #[test]
    fn test_braces_inside_strings_do_not_confuse_extraction() {
        let raw = r#"note {"operations":[{"type":"select","columns":["weird{name}"]}]} done"#;
        let extracted = extract_json(raw).unwrap();
        assert_eq!(extracted, r#"{"operations":[{"type":"select","columns":["weird{name}"]}]}"#);
    }

    #[test]
    fn test_escaped_quotes_inside_strings() {
        let raw = r#"{"operations":[{"type":"select","columns":["say \"hi\""]}]}"#;
        assert_eq!(extract_json(raw), Ok(raw));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(parse(r#"{"operations": [}"#), Err(MalformedJson(..))));
    }

    #[test]
    fn test_mapping_errors_surface_from_parse() {
        let raw = r#"{"operations":[{"type":"rotate"}]}"#;
        assert_eq!(parse(raw), Err(UnsupportedOperator("rotate".into())));
    }
}
