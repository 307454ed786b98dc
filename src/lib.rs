//! tablesift: a natural-language-driven tabular query engine.
//!
//! An external text generator turns a user's request about a loaded table
//! into a JSON query plan (filter / sort / select / aggregate). This crate
//! owns everything after that: it digs the plan out of the generator's raw
//! output, decodes it into strict tagged types, applies it to the in-memory
//! table, and reports a human-readable summary plus a structured aggregate
//! map. CSV/TSV ingestion, CSV export and generator prompt construction are
//! included; the text generation itself is not.

pub mod columns;
pub mod dataframes;
pub mod errors;
pub mod plan_parser;
pub mod plans;
pub mod prompts;
pub mod query_engine;
pub mod readers;
pub mod responses;
pub mod sessions;
#[cfg(test)]
pub mod testdata;
pub mod typed_values;
pub mod writers;

pub use columns::Column;
pub use dataframes::DataFrame;
pub use errors::Errors;
pub use plan_parser::parse;
pub use plans::{Operation, QueryPlan};
pub use query_engine::{execute, AggregateMap, ExecutionResult};
pub use responses::format_response;
pub use sessions::Session;
pub use typed_values::TypedValue;
