use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;

use crate::consolidation::adjustments::{AcquisitionAdjustments, FinancingImpacts};
use crate::consolidation::combiner::BalanceSheetCombiner;
use crate::consolidation::scenario::{calculate_metrics, LeverageMetrics, ScenarioSet};
use crate::error::ConsolidationError;
use crate::ledger::{Account, BalanceSheet};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::ConsolResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Final state of one scenario run: the post-deal ledger and the
/// figures derived from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub balance_sheet: BalanceSheet,
    pub metrics: LeverageMetrics,
    pub financing_impacts: FinancingImpacts,
}

/// Results for every scenario, in configuration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidationOutput {
    pub scenarios: Vec<ScenarioResult>,
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

/// Orchestrates the consolidation pipeline per scenario: combine the
/// source ledgers, apply purchase accounting, fund the deal, derive
/// leverage metrics.
#[derive(Debug, Clone)]
pub struct ConsolidationWorkflow {
    combiner: BalanceSheetCombiner,
    adjustments: AcquisitionAdjustments,
    scenarios: ScenarioSet,
}

impl ConsolidationWorkflow {
    pub fn new(
        combiner: BalanceSheetCombiner,
        adjustments: AcquisitionAdjustments,
        scenarios: ScenarioSet,
    ) -> Self {
        Self {
            combiner,
            adjustments,
            scenarios,
        }
    }

    pub fn scenarios(&self) -> &ScenarioSet {
        &self.scenarios
    }

    /// Run the pipeline for one named scenario. Lenient no-op postings
    /// (a goodwill line or stepped-up asset absent from the ledger)
    /// are reported through `warnings`.
    pub fn process_scenario(
        &self,
        scenario_name: &str,
        intercompany_balances: Option<&HashMap<Account, Money>>,
        interest_rate: Rate,
        warnings: &mut Vec<String>,
    ) -> ConsolResult<ScenarioResult> {
        let config = self.scenarios.get(scenario_name)?;

        let combined = self.combiner.combine(intercompany_balances)?;
        if !BalanceSheetCombiner::verify(&combined) {
            return Err(ConsolidationError::Unbalanced {
                side: "Combined".into(),
                assets: combined.total_assets(),
                liabilities_and_equity: combined.total_liabilities_and_equity(),
            });
        }
        let combined = combined.canonicalized();

        if combined.get(&Account::Goodwill).is_none() {
            warnings.push(format!(
                "Scenario '{scenario_name}': no Goodwill line in the combined ledger; \
                 the goodwill posting was dropped (seed Goodwill at 0 to record it)"
            ));
        }
        for asset in self.adjustments.config().asset_step_ups.keys() {
            if combined.get(asset).is_none() {
                warnings.push(format!(
                    "Scenario '{scenario_name}': step-up on '{asset}' ignored; \
                     account not present in the combined ledger"
                ));
            }
        }

        let adjusted = self.adjustments.apply(&combined);
        let financing_impacts = self
            .adjustments
            .financing_impacts(config.financing_mix.debt, interest_rate);

        let final_sheet = config.apply_to(&adjusted);
        let metrics = calculate_metrics(&final_sheet)?;

        Ok(ScenarioResult {
            name: scenario_name.to_string(),
            balance_sheet: final_sheet,
            metrics,
            financing_impacts,
        })
    }

    /// Process every configured scenario in insertion order. The first
    /// failing scenario aborts the whole run; there is no
    /// partial-result recovery.
    pub fn run_all_scenarios(
        &self,
        intercompany_balances: Option<&HashMap<Account, Money>>,
        interest_rate: Rate,
    ) -> ConsolResult<ComputationOutput<ConsolidationOutput>> {
        let start = Instant::now();
        let mut warnings: Vec<String> = Vec::new();

        let mut results = Vec::with_capacity(self.scenarios.len());
        for name in self.scenarios.names() {
            results.push(self.process_scenario(
                name,
                intercompany_balances,
                interest_rate,
                &mut warnings,
            )?);
        }

        let output = ConsolidationOutput { scenarios: results };

        let elapsed = start.elapsed().as_micros() as u64;
        Ok(with_metadata(
            "Post-Acquisition Balance Sheet Consolidation",
            &serde_json::json!({
                "num_scenarios": self.scenarios.len(),
                "interest_rate": interest_rate.to_string(),
                "intercompany_eliminations": intercompany_balances.map_or(0, HashMap::len),
            }),
            warnings,
            elapsed,
            output,
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consolidation::adjustments::AcquisitionConfig;
    use crate::consolidation::scenario::{FinancingMix, ScenarioConfig, Synergies};
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn acquirer() -> BalanceSheet {
        BalanceSheet::from_entries([
            (Account::CashAndEquivalents, dec!(50_000)),
            (Account::AccountsReceivable, dec!(20_000)),
            (Account::Inventory, dec!(10_000)),
            (Account::PropertyPlantEquipment, dec!(100_000)),
            (Account::Goodwill, dec!(0)),
            (Account::AccountsPayable, dec!(15_000)),
            (Account::ShortTermDebt, dec!(5_000)),
            (Account::LongTermDebt, dec!(60_000)),
            (Account::ShareholdersEquity, dec!(100_000)),
        ])
        .unwrap()
    }

    fn target() -> BalanceSheet {
        BalanceSheet::from_entries([
            (Account::CashAndEquivalents, dec!(15_000)),
            (Account::AccountsReceivable, dec!(10_000)),
            (Account::Inventory, dec!(5_000)),
            (Account::PropertyPlantEquipment, dec!(20_000)),
            (Account::Goodwill, dec!(0)),
            (Account::AccountsPayable, dec!(8_000)),
            (Account::ShortTermDebt, dec!(2_000)),
            (Account::LongTermDebt, dec!(15_000)),
            (Account::ShareholdersEquity, dec!(25_000)),
        ])
        .unwrap()
    }

    fn scenario(debt: rust_decimal::Decimal) -> ScenarioConfig {
        ScenarioConfig {
            purchase_price: dec!(150_000),
            financing_mix: FinancingMix {
                debt,
                equity: dec!(1) - debt,
            },
            synergies: Synergies {
                cost_savings: dec!(5_000),
                revenue_growth: dec!(3_000),
            },
            transaction_costs: dec!(2_000),
            tax_rate: dec!(0.25),
        }
    }

    fn workflow() -> ConsolidationWorkflow {
        let combiner = BalanceSheetCombiner::new(acquirer(), target()).unwrap();
        let adjustments = AcquisitionAdjustments::new(AcquisitionConfig {
            purchase_price: dec!(150_000),
            target_book_value: dec!(50_000),
            tax_rate: dec!(0.25),
            asset_step_ups: BTreeMap::from([
                (Account::PropertyPlantEquipment, dec!(20_000)),
                (Account::Inventory, dec!(5_000)),
            ]),
            depreciation_periods: BTreeMap::from([
                (Account::PropertyPlantEquipment, 10),
                (Account::Inventory, 1),
            ]),
        })
        .unwrap();
        let scenarios = ScenarioSet::new([
            ("Conservative".to_string(), scenario(dec!(0.4))),
            ("Base".to_string(), scenario(dec!(0.6))),
            ("Aggressive".to_string(), scenario(dec!(0.8))),
        ])
        .unwrap();

        ConsolidationWorkflow::new(combiner, adjustments, scenarios)
    }

    #[test]
    fn test_run_all_scenarios_in_configuration_order() {
        let output = workflow().run_all_scenarios(None, dec!(0.05)).unwrap();
        let names: Vec<&str> = output
            .result
            .scenarios
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["Conservative", "Base", "Aggressive"]);
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_base_scenario_figures() {
        let output = workflow().run_all_scenarios(None, dec!(0.05)).unwrap();
        let base = &output.result.scenarios[1];

        // 150 000 * 0.6 debt at 5%
        assert_eq!(base.financing_impacts.debt_financing, dec!(90_000));
        assert_eq!(base.financing_impacts.net_interest_cost, dec!(3_375));

        let sheet = &base.balance_sheet;
        // Combined 120 000 + 20 000 step-up
        assert_eq!(sheet.get(&Account::PropertyPlantEquipment), Some(dec!(140_000)));
        // Goodwill 150 000 - (50 000 + 25 000)
        assert_eq!(sheet.get(&Account::Goodwill), Some(dec!(75_000)));
        assert_eq!(sheet.get(&Account::DeferredTaxLiability), Some(dec!(6_250)));
        // Cash 65 000 + 8 000 synergies - 2 000 costs
        assert_eq!(sheet.get(&Account::CashAndEquivalents), Some(dec!(71_000)));
        // Debt 75 000 + 90 000; Equity 125 000 + 60 000
        assert_eq!(sheet.get(&Account::LongTermDebt), Some(dec!(165_000)));
        assert_eq!(sheet.get(&Account::ShareholdersEquity), Some(dec!(185_000)));

        // leverage = (7 000 + 165 000) / 185 000
        assert_eq!(base.metrics.leverage_ratio, dec!(172_000) / dec!(185_000));
    }

    #[test]
    fn test_final_ledger_is_canonically_ordered_with_dtl_last() {
        let output = workflow().run_all_scenarios(None, dec!(0.05)).unwrap();
        let sheet = &output.result.scenarios[0].balance_sheet;

        assert_eq!(sheet.entries()[0].account, Account::CashAndEquivalents);
        assert_eq!(sheet.entries()[8].account, Account::ShareholdersEquity);
        assert_eq!(sheet.entries()[9].account, Account::DeferredTaxLiability);
    }

    #[test]
    fn test_intercompany_elimination_flows_through() {
        let eliminations = HashMap::from([
            (Account::AccountsReceivable, dec!(5_000)),
            (Account::AccountsPayable, dec!(5_000)),
        ]);

        let output = workflow()
            .run_all_scenarios(Some(&eliminations), dec!(0.05))
            .unwrap();
        let sheet = &output.result.scenarios[1].balance_sheet;
        assert_eq!(sheet.get(&Account::AccountsReceivable), Some(dec!(25_000)));
        assert_eq!(sheet.get(&Account::AccountsPayable), Some(dec!(18_000)));
    }

    #[test]
    fn test_asymmetric_elimination_aborts_run() {
        let eliminations = HashMap::from([(Account::AccountsReceivable, dec!(5_000))]);

        let err = workflow()
            .run_all_scenarios(Some(&eliminations), dec!(0.05))
            .unwrap_err();
        match err {
            ConsolidationError::Unbalanced { side, .. } => assert_eq!(side, "Combined"),
            other => panic!("Expected Unbalanced error, got: {other}"),
        }
    }

    #[test]
    fn test_missing_goodwill_line_warns() {
        let strip_goodwill = |sheet: BalanceSheet| {
            BalanceSheet::from_entries(
                sheet
                    .entries()
                    .iter()
                    .filter(|e| e.account != Account::Goodwill)
                    .map(|e| (e.account.clone(), e.amount)),
            )
            .unwrap()
        };

        let combiner =
            BalanceSheetCombiner::new(strip_goodwill(acquirer()), strip_goodwill(target()))
                .unwrap();
        let base = workflow();
        let flow = ConsolidationWorkflow::new(
            combiner,
            base.adjustments.clone(),
            ScenarioSet::new([("Base".to_string(), scenario(dec!(0.6)))]).unwrap(),
        );

        let output = flow.run_all_scenarios(None, dec!(0.05)).unwrap();
        assert!(output.warnings.iter().any(|w| w.contains("Goodwill")));
        assert_eq!(
            output.result.scenarios[0]
                .balance_sheet
                .get(&Account::Goodwill),
            None
        );
    }

    #[test]
    fn test_unknown_scenario_aborts() {
        let flow = workflow();
        let mut warnings = Vec::new();
        let err = flow
            .process_scenario("Moonshot", None, dec!(0.05), &mut warnings)
            .unwrap_err();
        assert!(matches!(err, ConsolidationError::ScenarioNotFound(_)));
    }

    #[test]
    fn test_methodology_string() {
        let output = workflow().run_all_scenarios(None, dec!(0.05)).unwrap();
        assert_eq!(
            output.methodology,
            "Post-Acquisition Balance Sheet Consolidation"
        );
    }
}
