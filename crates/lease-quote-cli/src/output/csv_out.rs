use serde_json::Value;
use std::io::{self, Write};

use super::flatten_fields;

/// Write a quote as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let _ = write_csv(stdout.lock(), value);
}

fn write_csv<W: Write>(out: W, value: &Value) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(out);

    match value {
        Value::Object(map) => {
            // Two-column CSV: field, value
            let fields = match map.get("result") {
                Some(Value::Object(result)) => flatten_fields(result),
                _ => flatten_fields(map),
            };
            wtr.write_record(["field", "value"])?;
            for (key, val) in fields {
                wtr.write_record([key.as_str(), &format_csv_value(&val)])?;
            }
        }
        Value::Array(arr) => write_array_csv(&mut wtr, arr)?,
        _ => wtr.write_record([&format_csv_value(value)])?,
    }

    wtr.flush()?;
    Ok(())
}

/// One row per schedule month (or chart slice), headers from the first row.
fn write_array_csv<W: Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) -> Result<(), csv::Error> {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            wtr.write_record([&format_csv_value(item)])?;
        }
        return Ok(());
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    wtr.write_record(&headers)?;
    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                .collect();
            wtr.write_record(&row)?;
        }
    }
    Ok(())
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
