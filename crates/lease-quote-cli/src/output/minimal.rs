use serde_json::Value;

/// Keys that answer a quote, most specific first.
const PRIORITY_KEYS: [&str; 3] = [
    "monthly_instalment_net",
    "vehicle_value_net",
    "tax_shield",
];

/// Print just the headline figure of a quote.
///
/// Looks for a known answer field inside the `result` envelope, then falls
/// back to the first field of the result object.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_line(value));
}

fn minimal_line(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in &PRIORITY_KEYS {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    return format_minimal(val);
                }
            }
        }
        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, format_minimal(val));
        }
    }

    // Schedules print their final balance, the buyout due at maturity.
    if let Value::Array(rows) = result_obj {
        if let Some(balance) = rows.last().and_then(|r| r.get("closing_balance")) {
            return format_minimal(balance);
        }
    }

    format_minimal(result_obj)
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
