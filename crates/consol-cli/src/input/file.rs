use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::Path;

use consol_core::consolidation::{ScenarioConfig, ScenarioSet};

/// Read a JSON file and deserialise into a typed struct.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    let value: T = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
    Ok(value)
}

/// Read a scenario file: a JSON object mapping scenario name to config.
/// File order becomes the scenario processing order.
pub fn read_scenarios(path: &str) -> Result<ScenarioSet, Box<dyn std::error::Error>> {
    let value: Value = read_json(path)?;
    let map = value
        .as_object()
        .ok_or_else(|| format!("'{path}': expected a JSON object of scenario name -> config"))?;

    let mut named = Vec::with_capacity(map.len());
    for (name, config) in map {
        let config: ScenarioConfig = serde_json::from_value(config.clone())
            .map_err(|e| format!("Scenario '{name}': {e}"))?;
        named.push((name.clone(), config));
    }

    Ok(ScenarioSet::new(named)?)
}

/// Resolve and validate the path, preventing directory traversal.
fn resolve_path(path: &str) -> Result<std::path::PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}
