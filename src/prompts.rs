////////////////////////////////////////////////////////////////////
// prompts module
////////////////////////////////////////////////////////////////////

use itertools::Itertools;

use crate::dataframes::DataFrame;

/// Summarizes the table schema for the text generator: one line per column
/// with up to 5 distinct non-null sample values in row order.
pub fn column_summary(table: &DataFrame) -> String {
    table.get_columns().iter()
        .map(|column| format!(
            "Column '{}': sample values = [{}]",
            column.get_name(),
            column.sample_values(5).iter().map(|v| v.to_string()).join(", ")))
        .join("\n")
}

/// Renders the instruction prompt handed to the text-generation
/// collaborator: the schema summary, the plan JSON contract, and the user
/// request. The generator's reply is untrusted text; the plan parser
/// re-validates everything it contains.
pub fn plan_request_prompt(table: &DataFrame, question: &str) -> String {
    format!(r#"Given this summary of a tabular dataset:

{summary}

Convert this user request into structured JSON following this exact format:
{{
  "operations": [
    {{
      "type": "filter",
      "conditions": [
        {{"column": "ColumnName", "operator": "==", "value": "ExactValue"}},
        {{"column": "AnotherColumn", "operator": "in", "value": ["Value1", "Value2"]}},
        {{"column": "NumberColumn", "operator": ">", "value": 100}},
        {{"column": "TextColumn", "operator": "!=", "value": "ExcludeThis"}}
      ]
    }},
    {{
      "type": "sort",
      "columns": [
        {{"column": "ColumnName", "direction": "desc"}},
        {{"column": "AnotherColumn", "direction": "asc"}}
      ]
    }},
    {{
      "type": "select",
      "columns": ["ColumnName", "AnotherColumn"]
    }},
    {{
      "type": "aggregate",
      "calculations": [
        {{"function": "average", "column": "ColumnName"}},
        {{"function": "sum", "column": "AnotherColumn"}},
        {{"function": "max", "column": "ThirdColumn"}},
        {{"function": "min", "column": "FourthColumn"}}
      ]
    }}
  ]
}}

Rules:
- "operations" is a list of actions to perform in order on the current dataset.
- "filter" narrows rows:
  - "==" for exact match, "in" for multiple values, ">" or "<" for numbers, "!=" for exclusion.
  - Use "in" when the request lists multiple values for one column (e.g., "show X, Y, Z").
- "sort" orders rows: "desc" (highest to lowest), "asc" (lowest to highest).
  - Use "sort" for requests like "highest", "lowest", or "sort by".
- "select" picks columns to display: list the requested columns.
- "aggregate" calculates stats: "average", "sum", "max", "min" (e.g., "calculate average X").
- Match column names exactly as in the summary (case-sensitive).
- If the request implies working on the current filtered data, omit "filter" unless new conditions are specified.
- If no operation matches, return {{"operations": []}} and do nothing.
- Use only columns from the summary; guess the best column if ambiguous.

User request: "{question}"

Return ONLY the JSON object, nothing else. Do not include explanations, extra text, or the prompt itself.
"#, summary = column_summary(table), question = question)
}

// Unit tests
#[cfg(test)]
mod tests {
    use crate::prompts::{column_summary, plan_request_prompt};
    use crate::testdata::make_products_frame;

    #[test]
    fn test_column_summary_lists_distinct_samples_in_row_order() {
        let summary = column_summary(&make_products_frame());
        let lines = summary.lines().collect::<Vec<&str>>();
        assert_eq!(lines, vec![
            "Column 'Item': sample values = [Hammer, Bolt, Drill, Washer, Pliers]",
            "Column 'Category': sample values = [Tools, Hardware]",
            "Column 'Price': sample values = [12, 8, 45, 4.25, 3.5]",
            "Column 'Quantity': sample values = [5, 25, 12]",
        ]);
    }

    #[test]
    fn test_plan_request_prompt_carries_summary_and_question() {
        let prompt = plan_request_prompt(&make_products_frame(), "show the priciest tools");
        assert!(prompt.contains("Column 'Price': sample values = [12, 8, 45, 4.25, 3.5]"));
        assert!(prompt.contains("User request: \"show the priciest tools\""));
        assert!(prompt.contains("Return ONLY the JSON object"));
    }
}
