use serde_json::Value;

/// Print just the key answer value from the output.
///
/// A consolidation run prints one leverage ratio per scenario;
/// anything else falls back to well-known result fields in priority
/// order, then the first field.
pub fn print_minimal(value: &Value) {
    if let Some(scenarios) = crate::output::scenario_array(value) {
        for scenario in scenarios {
            let name = scenario
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("(unnamed)");
            let leverage = scenario
                .pointer("/metrics/leverage_ratio")
                .map(format_minimal)
                .unwrap_or_else(|| "n/a".to_string());
            println!("{}: {}", name, leverage);
        }
        return;
    }

    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = [
        "goodwill",
        "leverage_ratio",
        "balanced",
        "deferred_tax_liability",
        "debt_financing",
    ];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
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
