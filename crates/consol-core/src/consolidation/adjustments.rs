use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ConsolidationError;
use crate::ledger::{Account, BalanceSheet};
use crate::types::{Money, Rate};
use crate::ConsolResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Purchase-accounting assumptions for one acquisition. Constructed
/// once per run, read-only thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquisitionConfig {
    pub purchase_price: Money,
    pub target_book_value: Money,
    pub tax_rate: Rate,
    /// Fair-value step-ups per acquired asset.
    #[serde(default)]
    pub asset_step_ups: BTreeMap<Account, Money>,
    /// Depreciation period in years for each stepped-up asset. An
    /// asset with a step-up but no period contributes no annual
    /// depreciation.
    #[serde(default)]
    pub depreciation_periods: BTreeMap<Account, u32>,
}

impl AcquisitionConfig {
    pub fn total_step_ups(&self) -> Money {
        self.asset_step_ups.values().copied().sum()
    }
}

/// Depreciation and tax effects of the asset step-ups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepUpImpacts {
    pub annual_depreciation: BTreeMap<Account, Money>,
    pub total_annual_depreciation: Money,
    pub tax_shield: Money,
}

/// Annual cost of the debt-funded share of the purchase price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancingImpacts {
    pub debt_financing: Money,
    pub annual_interest: Money,
    pub interest_tax_shield: Money,
    pub net_interest_cost: Money,
}

// ---------------------------------------------------------------------------
// Adjustments
// ---------------------------------------------------------------------------

/// Computes goodwill, step-up and deferred-tax postings, and financing
/// impacts from an [`AcquisitionConfig`].
#[derive(Debug, Clone)]
pub struct AcquisitionAdjustments {
    config: AcquisitionConfig,
}

impl AcquisitionAdjustments {
    pub fn new(config: AcquisitionConfig) -> ConsolResult<Self> {
        validate_config(&config)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AcquisitionConfig {
        &self.config
    }

    /// Goodwill = purchase price − (target book value + total
    /// step-ups), floored at zero. Bargain purchases record no
    /// negative goodwill; they collapse to a zero adjustment.
    pub fn goodwill(&self) -> Money {
        let adjusted_book_value = self.config.target_book_value + self.config.total_step_ups();
        (self.config.purchase_price - adjusted_book_value).max(Decimal::ZERO)
    }

    /// Annual depreciation per stepped-up asset and the resulting tax
    /// shield. Assets with no depreciation period contribute zero.
    pub fn step_up_impacts(&self) -> StepUpImpacts {
        let mut annual_depreciation = BTreeMap::new();
        for (asset, step_up) in &self.config.asset_step_ups {
            let annual = match self.config.depreciation_periods.get(asset) {
                Some(period) => *step_up / Decimal::from(*period),
                None => Decimal::ZERO,
            };
            annual_depreciation.insert(asset.clone(), annual);
        }

        let total_annual_depreciation: Money = annual_depreciation.values().copied().sum();
        let tax_shield = total_annual_depreciation * self.config.tax_rate;

        StepUpImpacts {
            annual_depreciation,
            total_annual_depreciation,
            tax_shield,
        }
    }

    /// Post all purchase-accounting adjustments onto a ledger:
    /// goodwill, asset step-ups, and the deferred tax liability on the
    /// book/tax basis difference.
    ///
    /// Goodwill and step-ups increment existing lines only; a ledger
    /// without a Goodwill line silently drops the goodwill posting, so
    /// callers must seed `Goodwill: 0`. The Deferred Tax Liability
    /// line is upserted (appended at the end when absent).
    pub fn apply(&self, sheet: &BalanceSheet) -> BalanceSheet {
        let mut adjusted = sheet.clone();

        adjusted.increment(&Account::Goodwill, self.goodwill());

        for (asset, step_up) in &self.config.asset_step_ups {
            adjusted.increment(asset, *step_up);
        }

        let deferred_tax = self.config.total_step_ups() * self.config.tax_rate;
        adjusted.upsert(Account::DeferredTaxLiability, deferred_tax);

        adjusted
    }

    /// Annual financing cost of funding `debt_ratio` of the purchase
    /// price at `interest_rate`, with the interest tax shield at the
    /// configured tax rate.
    pub fn financing_impacts(&self, debt_ratio: Rate, interest_rate: Rate) -> FinancingImpacts {
        let debt_financing = self.config.purchase_price * debt_ratio;
        let annual_interest = debt_financing * interest_rate;
        let interest_tax_shield = annual_interest * self.config.tax_rate;

        FinancingImpacts {
            debt_financing,
            annual_interest,
            interest_tax_shield,
            net_interest_cost: annual_interest - interest_tax_shield,
        }
    }
}

fn validate_config(config: &AcquisitionConfig) -> ConsolResult<()> {
    if config.purchase_price < Decimal::ZERO {
        return Err(ConsolidationError::InvalidInput {
            field: "purchase_price".into(),
            reason: "Purchase price must not be negative".into(),
        });
    }
    if config.tax_rate < Decimal::ZERO || config.tax_rate > dec!(1) {
        return Err(ConsolidationError::InvalidInput {
            field: "tax_rate".into(),
            reason: "Tax rate must be between 0 and 1".into(),
        });
    }
    for (asset, period) in &config.depreciation_periods {
        if *period == 0 {
            return Err(ConsolidationError::InvalidInput {
                field: format!("depreciation_periods.{asset}"),
                reason: "Depreciation period must be at least one year".into(),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AcquisitionConfig {
        AcquisitionConfig {
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
        }
    }

    fn combined_sheet() -> BalanceSheet {
        BalanceSheet::from_entries([
            (Account::CashAndEquivalents, dec!(65_000)),
            (Account::AccountsReceivable, dec!(30_000)),
            (Account::Inventory, dec!(15_000)),
            (Account::PropertyPlantEquipment, dec!(120_000)),
            (Account::Goodwill, dec!(0)),
            (Account::AccountsPayable, dec!(23_000)),
            (Account::ShortTermDebt, dec!(7_000)),
            (Account::LongTermDebt, dec!(75_000)),
            (Account::ShareholdersEquity, dec!(125_000)),
        ])
        .unwrap()
    }

    #[test]
    fn test_goodwill() {
        let adjustments = AcquisitionAdjustments::new(base_config()).unwrap();
        // 150 000 - (50 000 + 25 000) = 75 000
        assert_eq!(adjustments.goodwill(), dec!(75_000));
    }

    #[test]
    fn test_goodwill_floors_at_zero() {
        let mut config = base_config();
        config.purchase_price = dec!(60_000);
        let adjustments = AcquisitionAdjustments::new(config).unwrap();
        // 60 000 < 75 000 adjusted book value => bargain purchase, zero
        assert_eq!(adjustments.goodwill(), Decimal::ZERO);
    }

    #[test]
    fn test_goodwill_monotonic_in_inputs() {
        let base = AcquisitionAdjustments::new(base_config()).unwrap();

        let mut higher_price = base_config();
        higher_price.purchase_price += dec!(10_000);
        let higher_price = AcquisitionAdjustments::new(higher_price).unwrap();
        assert!(higher_price.goodwill() >= base.goodwill());

        let mut higher_book = base_config();
        higher_book.target_book_value += dec!(10_000);
        let higher_book = AcquisitionAdjustments::new(higher_book).unwrap();
        assert!(higher_book.goodwill() <= base.goodwill());

        let mut higher_step_up = base_config();
        higher_step_up
            .asset_step_ups
            .insert(Account::AccountsReceivable, dec!(5_000));
        let higher_step_up = AcquisitionAdjustments::new(higher_step_up).unwrap();
        assert!(higher_step_up.goodwill() <= base.goodwill());
    }

    #[test]
    fn test_step_up_impacts() {
        let adjustments = AcquisitionAdjustments::new(base_config()).unwrap();
        let impacts = adjustments.step_up_impacts();

        // PP&E: 20 000 / 10 = 2 000; Inventory: 5 000 / 1 = 5 000
        assert_eq!(
            impacts.annual_depreciation[&Account::PropertyPlantEquipment],
            dec!(2_000)
        );
        assert_eq!(impacts.annual_depreciation[&Account::Inventory], dec!(5_000));
        assert_eq!(impacts.total_annual_depreciation, dec!(7_000));
        assert_eq!(impacts.tax_shield, dec!(1_750));
    }

    #[test]
    fn test_step_up_without_period_contributes_zero() {
        let mut config = base_config();
        config.depreciation_periods.remove(&Account::Inventory);
        let adjustments = AcquisitionAdjustments::new(config).unwrap();

        let impacts = adjustments.step_up_impacts();
        assert_eq!(impacts.annual_depreciation[&Account::Inventory], Decimal::ZERO);
        assert_eq!(impacts.total_annual_depreciation, dec!(2_000));
        assert_eq!(impacts.tax_shield, dec!(500));
    }

    #[test]
    fn test_apply_posts_goodwill_step_ups_and_deferred_tax() {
        let adjustments = AcquisitionAdjustments::new(base_config()).unwrap();
        let adjusted = adjustments.apply(&combined_sheet());

        assert_eq!(adjusted.get(&Account::Goodwill), Some(dec!(75_000)));
        assert_eq!(
            adjusted.get(&Account::PropertyPlantEquipment),
            Some(dec!(140_000))
        );
        assert_eq!(adjusted.get(&Account::Inventory), Some(dec!(20_000)));
        // 25 000 * 0.25, appended as a new line
        assert_eq!(adjusted.get(&Account::DeferredTaxLiability), Some(dec!(6_250)));
        assert_eq!(
            adjusted.entries().last().unwrap().account,
            Account::DeferredTaxLiability
        );

        // Input ledger untouched
        assert_eq!(combined_sheet().get(&Account::Goodwill), Some(dec!(0)));
    }

    #[test]
    fn test_apply_drops_goodwill_without_seeded_line() {
        let adjustments = AcquisitionAdjustments::new(base_config()).unwrap();
        let no_goodwill = BalanceSheet::from_entries(
            combined_sheet()
                .entries()
                .iter()
                .filter(|e| e.account != Account::Goodwill)
                .map(|e| (e.account.clone(), e.amount)),
        )
        .unwrap();

        let adjusted = adjustments.apply(&no_goodwill);
        // Documented precondition: the posting is lost, not appended
        assert_eq!(adjusted.get(&Account::Goodwill), None);
    }

    #[test]
    fn test_apply_increments_existing_deferred_tax_line() {
        let adjustments = AcquisitionAdjustments::new(base_config()).unwrap();
        let mut sheet = combined_sheet();
        sheet.upsert(Account::DeferredTaxLiability, dec!(1_000));

        let adjusted = adjustments.apply(&sheet);
        assert_eq!(adjusted.get(&Account::DeferredTaxLiability), Some(dec!(7_250)));
        assert_eq!(adjusted.len(), 10);
    }

    #[test]
    fn test_financing_impacts() {
        let adjustments = AcquisitionAdjustments::new(base_config()).unwrap();
        let impacts = adjustments.financing_impacts(dec!(0.6), dec!(0.05));

        assert_eq!(impacts.debt_financing, dec!(90_000));
        assert_eq!(impacts.annual_interest, dec!(4_500));
        assert_eq!(impacts.interest_tax_shield, dec!(1_125));
        assert_eq!(impacts.net_interest_cost, dec!(3_375));
    }

    #[test]
    fn test_invalid_tax_rate_rejected() {
        let mut config = base_config();
        config.tax_rate = dec!(1.2);

        let err = AcquisitionAdjustments::new(config).unwrap_err();
        match err {
            ConsolidationError::InvalidInput { field, .. } => assert_eq!(field, "tax_rate"),
            other => panic!("Expected InvalidInput error, got: {other}"),
        }
    }

    #[test]
    fn test_zero_depreciation_period_rejected() {
        let mut config = base_config();
        config.depreciation_periods.insert(Account::Inventory, 0);
        assert!(AcquisitionAdjustments::new(config).is_err());
    }
}
