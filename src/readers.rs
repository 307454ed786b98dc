////////////////////////////////////////////////////////////////////
// readers module
////////////////////////////////////////////////////////////////////

use std::fs;
use std::io;
use std::path::Path;

use log::info;

use crate::columns::Column;
use crate::dataframes::DataFrame;
use crate::errors::fail;
use crate::typed_values::TypedValue;

/// Reads a comma-separated file into a dataframe
pub fn read_csv(path: impl AsRef<Path>) -> io::Result<DataFrame> {
    read_delimited(path, ',')
}

/// Reads a tab-separated file into a dataframe
pub fn read_tsv(path: impl AsRef<Path>) -> io::Result<DataFrame> {
    read_delimited(path, '\t')
}

fn read_delimited(path: impl AsRef<Path>, delimiter: char) -> io::Result<DataFrame> {
    let text = fs::read_to_string(path.as_ref())?;
    let table = parse_delimited(&text, delimiter)?;
    info!("Loaded {} rows from {}", table.len(), path.as_ref().display());
    Ok(table)
}

/// Parses delimited text: first line is the header, `#`-prefixed lines are
/// comments (as written by the exporter), blank lines are skipped, and each
/// cell's type is inferred. A row may omit trailing fields (they become
/// null) but may not exceed the header width.
pub fn parse_delimited(text: &str, delimiter: char) -> io::Result<DataFrame> {
    let mut lines = text.lines()
        .enumerate()
        .filter(|(_, line)| !line.starts_with('#') && !line.trim().is_empty());
    let header = match lines.next() {
        Some((_, line)) => split_line(line, delimiter).iter()
            .map(|name| name.trim().to_string())
            .collect::<Vec<String>>(),
        None => return fail("File contains no header row"),
    };
    let mut columns: Vec<Vec<TypedValue>> = vec![Vec::new(); header.len()];
    for (line_no, line) in lines {
        let fields = split_line(line, delimiter);
        if fields.len() > header.len() {
            return fail(format!(
                "Line {} has {} fields; expected at most {}",
                line_no + 1, fields.len(), header.len()));
        }
        for (n, values) in columns.iter_mut().enumerate() {
            let cell = fields.get(n)
                .map(|field| TypedValue::infer(field))
                .unwrap_or(TypedValue::Null);
            values.push(cell);
        }
    }
    let columns = header.into_iter().zip(columns)
        .map(|(name, values)| Column::new(name, values))
        .collect();
    DataFrame::new(columns)
}

/// Splits one line into fields, honoring double-quoted fields with `""`
/// escapes
fn split_line(line: &str, delimiter: char) -> Vec<String> {
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
        } else if c == '"' {
            in_quotes = true;
        } else if c == delimiter {
            fields.push(field.to_string());
            field.clear();
        } else {
            field.push(c);
        }
    }
    fields.push(field);
    fields
}

// Unit tests
#[cfg(test)]
mod tests {
    use crate::readers::{parse_delimited, split_line};
    use crate::typed_values::TypedValue::{Boolean, Null, Number, StringValue};

    #[test]
    fn test_parse_infers_cell_types() {
        let table = parse_delimited("Item,Price,InStock\nHammer,12,true\nBolt,8.5,false\n", ',').unwrap();
        assert_eq!(table.get_column_names(), vec!["Item", "Price", "InStock"]);
        assert_eq!(table.get_row(0), vec![
            &StringValue("Hammer".into()), &Number(12.), &Boolean(true),
        ]);
        assert_eq!(table.get_row(1), vec![
            &StringValue("Bolt".into()), &Number(8.5), &Boolean(false),
        ]);
    }

    #[test]
    fn test_parse_missing_trailing_fields_become_null() {
        let table = parse_delimited("Item,Quantity\nHammer,5\nBolt\n", ',').unwrap();
        assert_eq!(table.get_row(1), vec![&StringValue("Bolt".into()), &Null]);
    }

    #[test]
    fn test_parse_rejects_extra_fields() {
        assert!(parse_delimited("Item\nHammer,5\n", ',').is_err());
    }

    #[test]
    fn test_parse_rejects_duplicate_headers() {
        assert!(parse_delimited("Price,Price\n1,2\n", ',').is_err());
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let table = parse_delimited("# a note\nItem\n\nHammer\n# another\nBolt\n", ',').unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_parse_tab_delimited() {
        let table = parse_delimited("Item\tPrice\nHammer\t12\n", '\t').unwrap();
        assert_eq!(table.get_row(0), vec![&StringValue("Hammer".into()), &Number(12.)]);
    }

    #[test]
    fn test_split_line_honors_quotes() {
        assert_eq!(split_line(r#"plain,"a, b","say ""hi""""#, ','), vec![
            "plain".to_string(),
            "a, b".to_string(),
            r#"say "hi""#.to_string(),
        ]);
    }

    #[test]
    fn test_parse_empty_text_fails() {
        assert!(parse_delimited("", ',').is_err());
    }
}
