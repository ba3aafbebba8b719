use serde_json::Value;
use tabled::{builder::Builder, Table};

/// Format output as tables using the tabled crate.
///
/// A consolidation run gets one balance-sheet table plus a figures
/// table per scenario; any other value falls back to a flat
/// field/value table.
pub fn print_table(value: &Value) {
    if let Some(scenarios) = crate::output::scenario_array(value) {
        for scenario in scenarios {
            print_scenario(scenario);
        }
        print_envelope_footer(value);
        return;
    }

    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_flat_object(result);
                print_envelope_footer(value);
            } else {
                print_flat_object(value);
            }
        }
        _ => println!("{}", value),
    }
}

fn print_scenario(scenario: &Value) {
    let name = scenario
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("(unnamed)");
    println!("Scenario: {}", name);

    if let Some(Value::Array(entries)) = scenario.get("balance_sheet") {
        let mut builder = Builder::default();
        builder.push_record(["Account", "Amount"]);
        for entry in entries {
            let account = entry
                .get("account")
                .and_then(Value::as_str)
                .unwrap_or_default();
            let amount = entry.get("amount").map(format_value).unwrap_or_default();
            builder.push_record([account, amount.as_str()]);
        }
        println!("{}", Table::from(builder));
    }

    // Metrics and financing impacts share one figures table
    let mut builder = Builder::default();
    builder.push_record(["Figure", "Value"]);
    for section in ["metrics", "financing_impacts"] {
        if let Some(Value::Object(map)) = scenario.get(section) {
            for (key, val) in map {
                builder.push_record([key.as_str(), format_value(val).as_str()]);
            }
        }
    }
    println!("{}\n", Table::from(builder));
}

fn print_envelope_footer(value: &Value) {
    let Some(envelope) = value.as_object() else {
        return;
    };

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("Warnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), format_value(val).as_str()]);
        }
        println!("{}", Table::from(builder));
    } else {
        println!("{}", value);
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
