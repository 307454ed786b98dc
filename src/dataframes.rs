////////////////////////////////////////////////////////////////////
// dataframes module
////////////////////////////////////////////////////////////////////

use std::io;

use serde::{Deserialize, Serialize};

use crate::columns::Column;
use crate::errors::fail;
use crate::typed_values::TypedValue;

/// DataFrame is a logical representation of a table: an ordered collection
/// of equal-length named columns. Column names are unique.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DataFrame {
    columns: Vec<Column>,
}

impl DataFrame {
    /// Creates a new dataframe, verifying the column invariants
    pub fn new(columns: Vec<Column>) -> io::Result<DataFrame> {
        for (n, column) in columns.iter().enumerate() {
            if columns[..n].iter().any(|c| c.get_name() == column.get_name()) {
                return fail(format!("Duplicate column '{}'", column.get_name()));
            }
            if column.len() != columns[0].len() {
                return fail(format!(
                    "Column '{}' has {} rows; expected {}",
                    column.get_name(), column.len(), columns[0].len()));
            }
        }
        Ok(Self::from_columns(columns))
    }

    /// Creates a new dataframe from columns already known to be coherent
    pub(crate) fn from_columns(columns: Vec<Column>) -> DataFrame {
        DataFrame { columns }
    }

    pub fn get_columns(&self) -> &Vec<Column> {
        &self.columns
    }

    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.get_name() == name)
    }

    pub fn get_column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.get_name()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.get_name() == name)
    }

    /// Returns the number of rows
    pub fn len(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns one row of cell values
    pub fn get_row(&self, row_id: usize) -> Vec<&TypedValue> {
        self.columns.iter().map(|c| c.get_value(row_id)).collect()
    }

    /// Returns a copy containing only the rows whose mask entry is true
    pub fn filter_rows(&self, keep: &[bool]) -> DataFrame {
        let row_ids = keep.iter().enumerate()
            .filter(|(_, keep)| **keep)
            .map(|(id, _)| id)
            .collect::<Vec<usize>>();
        self.take_rows(&row_ids)
    }

    /// Returns a copy containing the rows at `row_ids`, in that order
    pub fn take_rows(&self, row_ids: &[usize]) -> DataFrame {
        let columns = self.columns.iter()
            .map(|c| c.take_rows(row_ids))
            .collect();
        Self::from_columns(columns)
    }
}
