use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ConsolidationError;
use crate::ledger::{Account, BalanceSheet};
use crate::types::{Money, Rate};
use crate::ConsolResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Split of the purchase price between debt and equity funding.
/// The two fractions must sum to 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancingMix {
    pub debt: Rate,
    pub equity: Rate,
}

/// Annual synergy assumptions; both land in cash in this model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Synergies {
    pub cost_savings: Money,
    pub revenue_growth: Money,
}

impl Synergies {
    pub fn total(&self) -> Money {
        self.cost_savings + self.revenue_growth
    }
}

/// One named deal scenario. Immutable once constructed; every scenario
/// operation takes the config explicitly, so no selector state exists
/// and scenario runs are independent of each other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub purchase_price: Money,
    pub financing_mix: FinancingMix,
    pub synergies: Synergies,
    pub transaction_costs: Money,
    pub tax_rate: Rate,
}

const MIX_TOLERANCE: Decimal = dec!(0.000001);

impl ScenarioConfig {
    pub fn validate(&self, scenario: &str) -> ConsolResult<()> {
        let mix_sum = self.financing_mix.debt + self.financing_mix.equity;
        if (mix_sum - Decimal::ONE).abs() > MIX_TOLERANCE {
            return Err(ConsolidationError::InvalidInput {
                field: format!("scenario:{scenario} financing_mix"),
                reason: format!("Debt and equity fractions must sum to 1.0 (got {mix_sum})"),
            });
        }
        if self.tax_rate < Decimal::ZERO || self.tax_rate > Decimal::ONE {
            return Err(ConsolidationError::InvalidInput {
                field: format!("scenario:{scenario} tax_rate"),
                reason: "Tax rate must be between 0 and 1".into(),
            });
        }
        Ok(())
    }

    /// Apply the scenario's capital-structure and cash adjustments:
    /// new debt and equity raised to fund the price, transaction costs
    /// out of cash, synergies into cash. Each account is read from the
    /// pre-adjustment ledger exactly once — the two cash effects are
    /// netted into a single posting. Absent accounts are no-ops,
    /// matching the purchase-accounting posting policy.
    pub fn apply_to(&self, sheet: &BalanceSheet) -> BalanceSheet {
        let mut adjusted = sheet.clone();

        let debt_financing = self.purchase_price * self.financing_mix.debt;
        let equity_financing = self.purchase_price * self.financing_mix.equity;
        adjusted.increment(&Account::LongTermDebt, debt_financing);
        adjusted.increment(&Account::ShareholdersEquity, equity_financing);

        let net_cash_impact = self.synergies.total() - self.transaction_costs;
        adjusted.increment(&Account::CashAndEquivalents, net_cash_impact);

        adjusted
    }
}

// ---------------------------------------------------------------------------
// Scenario collection
// ---------------------------------------------------------------------------

/// Named scenario configurations, iterated in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ScenarioSet {
    scenarios: Vec<(String, ScenarioConfig)>,
}

impl ScenarioSet {
    /// Build a scenario set, validating every config eagerly so
    /// downstream computation can assume well-formed scenarios.
    pub fn new(
        scenarios: impl IntoIterator<Item = (String, ScenarioConfig)>,
    ) -> ConsolResult<Self> {
        let mut set = ScenarioSet::default();
        for (name, config) in scenarios {
            if set.scenarios.iter().any(|(existing, _)| existing == &name) {
                return Err(ConsolidationError::InvalidInput {
                    field: "scenarios".into(),
                    reason: format!("Duplicate scenario name '{name}'"),
                });
            }
            config.validate(&name)?;
            set.scenarios.push((name, config));
        }
        Ok(set)
    }

    pub fn get(&self, name: &str) -> ConsolResult<&ScenarioConfig> {
        self.scenarios
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, config)| config)
            .ok_or_else(|| ConsolidationError::ScenarioNotFound(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ScenarioConfig)> {
        self.scenarios
            .iter()
            .map(|(name, config)| (name.as_str(), config))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scenarios.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Post-deal leverage ratios.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeverageMetrics {
    pub leverage_ratio: Decimal,
    pub debt_to_assets: Decimal,
    pub equity_to_assets: Decimal,
}

/// Compute leverage metrics from a final ledger. Total debt is
/// short-term plus long-term debt; total assets covers the asset-class
/// taxonomy accounts. Zero equity or zero assets is a defined
/// division-by-zero error, never an infinity.
pub fn calculate_metrics(sheet: &BalanceSheet) -> ConsolResult<LeverageMetrics> {
    let total_debt = sheet.get(&Account::ShortTermDebt).unwrap_or(Decimal::ZERO)
        + sheet.get(&Account::LongTermDebt).unwrap_or(Decimal::ZERO);
    let equity = sheet
        .get(&Account::ShareholdersEquity)
        .unwrap_or(Decimal::ZERO);
    let total_assets = sheet.total_assets();

    if equity.is_zero() {
        return Err(ConsolidationError::DivisionByZero {
            context: "leverage_ratio (Shareholders' Equity is zero)".into(),
        });
    }
    if total_assets.is_zero() {
        return Err(ConsolidationError::DivisionByZero {
            context: "debt_to_assets (total assets are zero)".into(),
        });
    }

    Ok(LeverageMetrics {
        leverage_ratio: total_debt / equity,
        debt_to_assets: total_debt / total_assets,
        equity_to_assets: equity / total_assets,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
