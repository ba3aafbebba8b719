pub mod csv_out;
pub mod export;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Pull the per-scenario results array out of the computation
/// envelope, if this value is a consolidation run.
pub(crate) fn scenario_array(value: &Value) -> Option<&Vec<Value>> {
    value
        .as_object()?
        .get("result")?
        .as_object()?
        .get("scenarios")?
        .as_array()
}
