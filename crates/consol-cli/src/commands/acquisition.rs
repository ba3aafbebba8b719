use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::BTreeMap;

use consol_core::consolidation::{AcquisitionAdjustments, AcquisitionConfig};

use crate::input;

/// Arguments for the goodwill / step-up calculation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct GoodwillArgs {
    /// Total purchase price
    #[arg(long)]
    pub purchase_price: Option<Decimal>,

    /// Target company book value
    #[arg(long)]
    pub target_book_value: Option<Decimal>,

    /// Marginal tax rate (e.g. 0.25 for 25%)
    #[arg(long)]
    pub tax_rate: Option<Decimal>,

    /// Path to a JSON acquisition config (overrides individual flags;
    /// required for asset step-ups and depreciation periods)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_goodwill(args: GoodwillArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let config: AcquisitionConfig = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        AcquisitionConfig {
            purchase_price: args
                .purchase_price
                .ok_or("--purchase-price is required (or provide --input)")?,
            target_book_value: args
                .target_book_value
                .ok_or("--target-book-value is required (or provide --input)")?,
            tax_rate: args
                .tax_rate
                .ok_or("--tax-rate is required (or provide --input)")?,
            asset_step_ups: BTreeMap::new(),
            depreciation_periods: BTreeMap::new(),
        }
    };

    let adjustments = AcquisitionAdjustments::new(config)?;
    let deferred_tax_liability =
        adjustments.config().total_step_ups() * adjustments.config().tax_rate;

    Ok(serde_json::json!({
        "goodwill": adjustments.goodwill(),
        "step_up_impacts": adjustments.step_up_impacts(),
        "deferred_tax_liability": deferred_tax_liability,
    }))
}
