pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("JSON serialization error: {}", e),
        },
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Flatten a result object into `(field, value)` rows. Nested objects become
/// dotted keys (`breakdown.buyout`); arrays of objects are summarised by
/// length so a chart or schedule does not swamp a two-column view.
pub(crate) fn flatten_fields(map: &Map<String, Value>) -> Vec<(String, Value)> {
    let mut rows = Vec::new();
    for (key, val) in map {
        match val {
            Value::Object(inner) => {
                for (sub_key, sub_val) in flatten_fields(inner) {
                    rows.push((format!("{}.{}", key, sub_key), sub_val));
                }
            }
            Value::Array(items) if items.iter().any(Value::is_object) => {
                rows.push((key.clone(), Value::String(format!("{} rows", items.len()))));
            }
            _ => rows.push((key.clone(), val.clone())),
        }
    }
    rows
}
