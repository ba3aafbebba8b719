use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::HashMap;

use consol_core::consolidation::{
    AcquisitionAdjustments, AcquisitionConfig, BalanceSheetCombiner, ConsolidationWorkflow,
};
use consol_core::{Account, Money};

use crate::input;
use crate::output;

/// Arguments for the full consolidation run
#[derive(Args)]
pub struct ConsolidateArgs {
    /// CSV with Account,Acquirer,Target columns
    #[arg(long)]
    pub balance_sheets: Option<String>,

    /// Acquirer CSV with Account,Amount columns (use with --target)
    #[arg(long, requires = "target")]
    pub acquirer: Option<String>,

    /// Target CSV with Account,Amount columns (use with --acquirer)
    #[arg(long, requires = "acquirer")]
    pub target: Option<String>,

    /// JSON object mapping scenario name to scenario config
    #[arg(long)]
    pub scenarios: String,

    /// JSON acquisition config (purchase price, target book value,
    /// tax rate, asset step-ups, depreciation periods)
    #[arg(long)]
    pub acquisition: String,

    /// JSON object mapping account name to the intercompany balance
    /// to eliminate
    #[arg(long)]
    pub intercompany: Option<String>,

    /// Annual interest rate on acquisition debt
    #[arg(long, default_value = "0.05")]
    pub interest_rate: Decimal,

    /// Write one CSV per scenario (balance sheet, metrics, financing
    /// impacts) into this directory
    #[arg(long)]
    pub export_dir: Option<String>,
}

/// Arguments for a standalone combine + verify
#[derive(Args)]
pub struct CombineArgs {
    /// CSV with Account,Acquirer,Target columns
    #[arg(long)]
    pub balance_sheets: Option<String>,

    /// Acquirer CSV with Account,Amount columns (use with --target)
    #[arg(long, requires = "target")]
    pub acquirer: Option<String>,

    /// Target CSV with Account,Amount columns (use with --acquirer)
    #[arg(long, requires = "acquirer")]
    pub target: Option<String>,

    /// JSON object mapping account name to the intercompany balance
    /// to eliminate
    #[arg(long)]
    pub intercompany: Option<String>,
}

pub fn run_consolidate(args: ConsolidateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let (acquirer, target) = input::balance_sheet::load_sources(
        args.balance_sheets.as_deref(),
        args.acquirer.as_deref(),
        args.target.as_deref(),
    )?;

    let scenarios = input::file::read_scenarios(&args.scenarios)?;
    let acquisition: AcquisitionConfig = input::file::read_json(&args.acquisition)?;
    let intercompany = read_intercompany(args.intercompany.as_deref())?;

    let combiner = BalanceSheetCombiner::new(acquirer, target)?;
    let adjustments = AcquisitionAdjustments::new(acquisition)?;
    let workflow = ConsolidationWorkflow::new(combiner, adjustments, scenarios);

    let result = workflow.run_all_scenarios(intercompany.as_ref(), args.interest_rate)?;

    if let Some(ref dir) = args.export_dir {
        for scenario in &result.result.scenarios {
            let path = output::export::write_scenario_csv(dir, scenario)?;
            eprintln!("Exported {}", path.display());
        }
    }

    Ok(serde_json::to_value(result)?)
}

pub fn run_combine(args: CombineArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let (acquirer, target) = input::balance_sheet::load_sources(
        args.balance_sheets.as_deref(),
        args.acquirer.as_deref(),
        args.target.as_deref(),
    )?;
    let intercompany = read_intercompany(args.intercompany.as_deref())?;

    let combiner = BalanceSheetCombiner::new(acquirer, target)?;
    let combined = combiner.combine(intercompany.as_ref())?.canonicalized();

    Ok(serde_json::json!({
        "balance_sheet": combined,
        "balanced": BalanceSheetCombiner::verify(&combined),
        "total_assets": combined.total_assets(),
        "total_liabilities_and_equity": combined.total_liabilities_and_equity(),
    }))
}

fn read_intercompany(
    path: Option<&str>,
) -> Result<Option<HashMap<Account, Money>>, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(Some(input::file::read_json(path)?)),
        None => Ok(None),
    }
}
