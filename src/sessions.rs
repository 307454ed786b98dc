////////////////////////////////////////////////////////////////////
// sessions module
////////////////////////////////////////////////////////////////////

use itertools::Itertools;
use log::{error, info};

use crate::dataframes::DataFrame;
use crate::errors::Errors;
use crate::plan_parser;
use crate::plans::QueryPlan;
use crate::query_engine;
use crate::responses::format_response;

/// Owns the loaded dataset's original and working versions plus the last
/// human-readable response. One caller at a time: `load`, `reset` and
/// `apply_plan` are synchronous, non-reentrant mutations, and this layer
/// provides no internal locking.
#[derive(Clone, Debug, Default)]
pub struct Session {
    original: Option<DataFrame>,
    current: Option<DataFrame>,
    last_response: String,
}

impl Session {
    pub fn new() -> Session {
        Session::default()
    }

    /// Loads a table, snapshotting it as the original and working copy
    pub fn load(&mut self, table: DataFrame) {
        info!("Loaded table with {} columns and {} rows",
              table.get_columns().len(), table.len());
        self.current = Some(table.to_owned());
        self.original = Some(table);
        self.last_response = String::new();
    }

    /// Restores the working table to the original snapshot
    pub fn reset(&mut self) -> Result<(), Errors> {
        match &self.original {
            None => {
                self.last_response = "No data loaded to reset.".to_string();
                Err(Errors::NoDataLoaded)
            }
            Some(original) => {
                self.current = Some(original.to_owned());
                self.last_response = "Reset to full dataset.".to_string();
                Ok(())
            }
        }
    }

    /// Parses and executes a plan from raw generator output against the
    /// working table. On success the working table is replaced wholesale;
    /// on any failure it is left untouched and the returned response is a
    /// diagnostic carrying the offending JSON and error detail. Never
    /// panics and never propagates an error to the caller.
    pub fn apply_plan(&mut self, raw_text: &str) -> &str {
        self.last_response = match self.try_apply(raw_text) {
            Ok(response) => response,
            Err(diagnostic) => {
                error!("Plan application failed: {}",
                       diagnostic.lines().next().unwrap_or_default());
                diagnostic
            }
        };
        self.last_response.as_str()
    }

    fn try_apply(&mut self, raw_text: &str) -> Result<String, String> {
        let current = match &self.current {
            Some(table) => table,
            None => return Err(Errors::NoDataLoaded.to_string()),
        };
        let fragment = plan_parser::extract_json(raw_text)
            .map_err(|e| format!("Error: {e}\nRaw output: {raw_text}"))?;
        let doc = plan_parser::decode_document(fragment)
            .map_err(|e| format!("Error parsing JSON:\n{fragment}\nDetails: {e}"))?;
        let plan = QueryPlan::from_json(&doc)
            .map_err(|e| format!("Error applying operations:\n{fragment}\nDetails: {e}"))?;
        let result = query_engine::execute(&plan, current)
            .map_err(|e| format!("Error applying operations:\n{fragment}\nDetails: {e}"))?;
        info!("Operations applied: {}", result.trace.iter().join("; "));
        let response = format_response(&result.trace, &result.aggregates);
        self.current = Some(result.table);
        Ok(response)
    }

    pub fn get_original(&self) -> Option<&DataFrame> {
        self.original.as_ref()
    }

    pub fn get_current(&self) -> Option<&DataFrame> {
        self.current.as_ref()
    }

    pub fn get_last_response(&self) -> &str {
        self.last_response.as_str()
    }
}
