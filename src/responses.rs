////////////////////////////////////////////////////////////////////
// responses module
////////////////////////////////////////////////////////////////////

use itertools::Itertools;

use crate::query_engine::AggregateMap;

/// Builds the human-readable message for a fully applied plan: the trace
/// lines joined by `"; "`, plus an `Aggregates:` line when any were
/// computed, in calculation order.
pub fn format_response(trace: &[String], aggregates: &AggregateMap) -> String {
    let mut response = format!("Operations successful: {}", trace.iter().join("; "));
    if !aggregates.is_empty() {
        response.push_str(&format!(
            "\nAggregates: {{{}}}",
            aggregates.iter().map(|(k, v)| format!("{k}: {v}")).join(", ")));
    }
    response
}
