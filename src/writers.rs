////////////////////////////////////////////////////////////////////
// writers module
////////////////////////////////////////////////////////////////////

use std::fs;
use std::fs::File;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use itertools::Itertools;
use log::info;

use crate::dataframes::DataFrame;
use crate::query_engine::AggregateMap;

/// Exports the table to a timestamped CSV file in `output_dir`, preceded by
/// the last response as comment lines and followed by the aggregate results.
/// Aggregates come from the structured map, never re-parsed out of the
/// formatted response text.
pub fn export_csv(
    table: &DataFrame,
    response: &str,
    aggregates: &AggregateMap,
    output_dir: impl AsRef<Path>,
) -> io::Result<PathBuf> {
    fs::create_dir_all(output_dir.as_ref())?;
    let filename = format!("export_{}.csv", Local::now().format("%Y%m%d_%H%M%S"));
    let full_path = output_dir.as_ref().join(filename);
    let mut file = File::create(&full_path)?;
    writeln!(file, "# AI Response:")?;
    for line in response.lines() {
        writeln!(file, "# {line}")?;
    }
    writeln!(file, "{}", table.get_column_names().iter()
        .map(|name| quote_field(name))
        .join(","))?;
    for row_id in 0..table.len() {
        let row = table.get_row(row_id).iter()
            .map(|value| if value.is_null() { String::new() } else { quote_field(&value.to_string()) })
            .join(",");
        writeln!(file, "{row}")?;
    }
    if !aggregates.is_empty() {
        writeln!(file, "# Aggregates:")?;
        for (key, value) in aggregates.iter() {
            writeln!(file, "# {key},{value}")?;
        }
    }
    info!("Data exported to {}", full_path.display());
    Ok(full_path)
}

fn quote_field(text: &str) -> String {
    if text.contains(',') || text.contains('"') || text.contains('\n') {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

// Unit tests
#[cfg(test)]
mod tests {
    use std::fs;

    use crate::query_engine::AggregateMap;
    use crate::readers::read_csv;
    use crate::testdata::make_products_frame;
    use crate::writers::export_csv;

    #[test]
    fn test_export_layout() {
        let out_dir = std::env::temp_dir().join("tablesift_export_layout");
        let mut aggregates = AggregateMap::new();
        aggregates.insert("Price_sum".into(), 72.75);
        let path = export_csv(
            &make_products_frame(),
            "Operations successful: Filtered by: Category == Tools",
            &aggregates,
            &out_dir,
        ).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# AI Response:\n# Operations successful: Filtered by: Category == Tools\n"));
        assert!(text.contains("Item,Category,Price,Quantity\n"));
        assert!(text.contains("Hammer,Tools,12,5\n"));
        // null cells export as empty fields
        assert!(text.contains("Drill,Tools,45,\n"));
        assert!(text.ends_with("# Aggregates:\n# Price_sum,72.75\n"));
        fs::remove_dir_all(&out_dir).ok();
    }

    #[test]
    fn test_export_round_trips_through_reader() {
        let out_dir = std::env::temp_dir().join("tablesift_export_roundtrip");
        let table = make_products_frame();
        let path = export_csv(&table, "Reset to full dataset.", &AggregateMap::new(), &out_dir).unwrap();
        let recovered = read_csv(&path).unwrap();
        assert_eq!(recovered, table);
        fs::remove_dir_all(&out_dir).ok();
    }
}
