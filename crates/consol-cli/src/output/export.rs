use std::fs;
use std::path::{Path, PathBuf};

use consol_core::consolidation::ScenarioResult;

/// Write one scenario's results to `<dir>/<scenario>.csv` as three
/// sections: balance sheet, metrics, financing impacts.
pub fn write_scenario_csv(
    dir: &str,
    result: &ScenarioResult,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    fs::create_dir_all(dir)?;
    let path = Path::new(dir).join(format!("{}.csv", sanitize_file_name(&result.name)));

    let mut wtr = csv::WriterBuilder::new().flexible(true).from_path(&path)?;

    wtr.write_record(["Balance Sheet"])?;
    wtr.write_record(["Account", "Amount"])?;
    for entry in result.balance_sheet.entries() {
        wtr.write_record([entry.account.name(), &entry.amount.to_string()])?;
    }

    wtr.write_record([""])?;
    wtr.write_record(["Metrics"])?;
    wtr.write_record(["Metric", "Value"])?;
    let metrics = &result.metrics;
    wtr.write_record(["leverage_ratio", &metrics.leverage_ratio.to_string()])?;
    wtr.write_record(["debt_to_assets", &metrics.debt_to_assets.to_string()])?;
    wtr.write_record(["equity_to_assets", &metrics.equity_to_assets.to_string()])?;

    wtr.write_record([""])?;
    wtr.write_record(["Financing Impacts"])?;
    wtr.write_record(["Impact", "Value"])?;
    let impacts = &result.financing_impacts;
    wtr.write_record(["debt_financing", &impacts.debt_financing.to_string()])?;
    wtr.write_record(["annual_interest", &impacts.annual_interest.to_string()])?;
    wtr.write_record(["interest_tax_shield", &impacts.interest_tax_shield.to_string()])?;
    wtr.write_record(["net_interest_cost", &impacts.net_interest_cost.to_string()])?;

    wtr.flush()?;
    Ok(path)
}

/// Scenario names come from user config; keep them path-safe.
fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            other => other,
        })
        .collect()
}
