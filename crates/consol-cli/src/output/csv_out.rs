use serde_json::Value;
use std::io;

/// Write output as CSV to stdout.
///
/// A consolidation run becomes long-form rows of
/// scenario,section,field,value; anything else becomes two-column
/// field,value rows.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    if let Some(scenarios) = crate::output::scenario_array(value) {
        let _ = wtr.write_record(["scenario", "section", "field", "value"]);
        for scenario in scenarios {
            write_scenario_rows(&mut wtr, scenario);
        }
    } else {
        match value {
            Value::Object(map) => {
                let flat = match map.get("result") {
                    Some(Value::Object(result)) => result,
                    _ => map,
                };
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in flat {
                    let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
                }
            }
            _ => {
                let _ = wtr.write_record([&format_csv_value(value)]);
            }
        }
    }

    let _ = wtr.flush();
}

fn write_scenario_rows(wtr: &mut csv::Writer<io::StdoutLock<'_>>, scenario: &Value) {
    let name = scenario
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default();

    if let Some(Value::Array(entries)) = scenario.get("balance_sheet") {
        for entry in entries {
            let account = entry
                .get("account")
                .and_then(Value::as_str)
                .unwrap_or_default();
            let amount = entry
                .get("amount")
                .map(|v| format_csv_value(v))
                .unwrap_or_default();
            let _ = wtr.write_record([name, "balance_sheet", account, &amount]);
        }
    }

    for section in ["metrics", "financing_impacts"] {
        if let Some(Value::Object(map)) = scenario.get(section) {
            for (key, val) in map {
                let _ = wtr.write_record([name, section, key.as_str(), &format_csv_value(val)]);
            }
        }
    }
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
