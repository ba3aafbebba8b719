use rust_decimal::Decimal;
use serde::Deserialize;

use consol_core::ledger::account::TAXONOMY;
use consol_core::{Account, BalanceSheet};

/// One row of the combined source form: Account,Acquirer,Target.
#[derive(Debug, Deserialize)]
struct PairRow {
    #[serde(rename = "Account")]
    account: String,
    #[serde(rename = "Acquirer")]
    acquirer: Decimal,
    #[serde(rename = "Target")]
    target: Decimal,
}

/// One row of the single-company form: Account,Amount.
#[derive(Debug, Deserialize)]
struct SingleRow {
    #[serde(rename = "Account")]
    account: String,
    #[serde(rename = "Amount")]
    amount: Decimal,
}

/// Read the three-column `Account,Acquirer,Target` CSV into the two
/// source ledgers.
pub fn read_pair(path: &str) -> Result<(BalanceSheet, BalanceSheet), Box<dyn std::error::Error>> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| format!("Failed to read '{path}': {e}"))?;

    let mut acquirer_entries = Vec::new();
    let mut target_entries = Vec::new();
    for row in reader.deserialize() {
        let row: PairRow = row.map_err(|e| format!("Failed to parse '{path}': {e}"))?;
        let account = Account::from(row.account);
        acquirer_entries.push((account.clone(), row.acquirer));
        target_entries.push((account, row.target));
    }

    let acquirer = BalanceSheet::from_entries(acquirer_entries)?;
    let target = BalanceSheet::from_entries(target_entries)?;
    validate_taxonomy(&acquirer, path)?;
    validate_taxonomy(&target, path)?;
    Ok((acquirer, target))
}

/// Read a two-column `Account,Amount` CSV into one ledger.
pub fn read_single(path: &str) -> Result<BalanceSheet, Box<dyn std::error::Error>> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| format!("Failed to read '{path}': {e}"))?;

    let mut entries = Vec::new();
    for row in reader.deserialize() {
        let row: SingleRow = row.map_err(|e| format!("Failed to parse '{path}': {e}"))?;
        entries.push((Account::from(row.account), row.amount));
    }

    let sheet = BalanceSheet::from_entries(entries)?;
    validate_taxonomy(&sheet, path)?;
    Ok(sheet)
}

/// Resolve the two source ledgers from either the combined
/// three-column file or a pair of two-column files.
pub fn load_sources(
    balance_sheets: Option<&str>,
    acquirer: Option<&str>,
    target: Option<&str>,
) -> Result<(BalanceSheet, BalanceSheet), Box<dyn std::error::Error>> {
    match (balance_sheets, acquirer, target) {
        (Some(path), None, None) => read_pair(path),
        (None, Some(acquirer_path), Some(target_path)) => {
            Ok((read_single(acquirer_path)?, read_single(target_path)?))
        }
        _ => Err("Provide either --balance-sheets, or both --acquirer and --target".into()),
    }
}

/// Every taxonomy account must be present; extra accounts are
/// tolerated and carried through.
fn validate_taxonomy(sheet: &BalanceSheet, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let missing: Vec<&str> = TAXONOMY
        .iter()
        .filter(|account| sheet.get(account).is_none())
        .map(|account| account.name())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(format!("'{path}' is missing required accounts: {}", missing.join(", ")).into())
    }
}
