use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ConsolidationError;
use crate::ledger::account::{Account, AccountClass};
use crate::types::Money;
use crate::ConsolResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One balance sheet line: an account and its signed amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub account: Account,
    pub amount: Money,
}

/// A flat balance sheet ledger: an ordered sequence of account lines,
/// one line per account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BalanceSheet {
    entries: Vec<LedgerEntry>,
}

/// Relative tolerance for the accounting equation check.
const BALANCE_RTOL: Decimal = dec!(0.00001);
/// Absolute tolerance floor (covers the all-zero ledger).
const BALANCE_ATOL: Decimal = dec!(0.00000001);

impl BalanceSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from (account, amount) pairs, preserving order.
    /// Duplicate accounts are rejected.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (Account, Money)>,
    ) -> ConsolResult<Self> {
        let mut sheet = BalanceSheet::new();
        for (account, amount) in entries {
            if sheet.get(&account).is_some() {
                return Err(ConsolidationError::InvalidInput {
                    field: "entries".into(),
                    reason: format!("Duplicate account '{account}'"),
                });
            }
            sheet.entries.push(LedgerEntry { account, amount });
        }
        Ok(sheet)
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, account: &Account) -> Option<Money> {
        self.entries
            .iter()
            .find(|e| &e.account == account)
            .map(|e| e.amount)
    }

    /// Add `delta` to an existing line. Returns `false` (leaving the
    /// ledger untouched) when the account has no line — the lenient
    /// increment-in-place policy for adjustment postings.
    pub fn increment(&mut self, account: &Account, delta: Money) -> bool {
        match self.entries.iter_mut().find(|e| &e.account == account) {
            Some(entry) => {
                entry.amount += delta;
                true
            }
            None => false,
        }
    }

    /// Add `delta` to an account, appending a zero-initialized line at
    /// the end first if the account is absent.
    pub fn upsert(&mut self, account: Account, delta: Money) {
        if !self.increment(&account, delta) {
            self.entries.push(LedgerEntry {
                account,
                amount: delta,
            });
        }
    }

    /// Sum of all lines in the given class. Unclassified lines never
    /// contribute to any total.
    pub fn class_total(&self, class: AccountClass) -> Money {
        self.entries
            .iter()
            .filter(|e| e.account.class() == class)
            .map(|e| e.amount)
            .sum()
    }

    pub fn total_assets(&self) -> Money {
        self.class_total(AccountClass::Asset)
    }

    pub fn total_liabilities_and_equity(&self) -> Money {
        self.class_total(AccountClass::Liability) + self.class_total(AccountClass::Equity)
    }

    /// Accounting equation check: assets ≈ liabilities + equity within
    /// relative tolerance 1e-5.
    pub fn is_balanced(&self) -> bool {
        let assets = self.total_assets();
        let liabilities_and_equity = self.total_liabilities_and_equity();
        (assets - liabilities_and_equity).abs()
            <= BALANCE_ATOL + BALANCE_RTOL * liabilities_and_equity.abs()
    }

    /// Reorder into the fixed display order: the taxonomy accounts in
    /// assets-then-liabilities order, anything else last, stably.
    /// Idempotent.
    pub fn canonicalized(&self) -> BalanceSheet {
        let mut entries = self.entries.clone();
        entries.sort_by_key(|e| e.account.display_rank().unwrap_or(usize::MAX));
        BalanceSheet { entries }
    }
}

impl<'a> IntoIterator for &'a BalanceSheet {
    type Item = &'a LedgerEntry;
    type IntoIter = std::slice::Iter<'a, LedgerEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_sheet() -> BalanceSheet {
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

    #[test]
    fn test_totals_and_balance() {
        let sheet = sample_sheet();
        assert_eq!(sheet.total_assets(), dec!(180_000));
        assert_eq!(sheet.total_liabilities_and_equity(), dec!(180_000));
        assert!(sheet.is_balanced());
    }

    #[test]
    fn test_duplicate_account_rejected() {
        let result = BalanceSheet::from_entries([
            (Account::CashAndEquivalents, dec!(100)),
            (Account::CashAndEquivalents, dec!(200)),
        ]);
        assert!(matches!(
            result,
            Err(ConsolidationError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_increment_missing_account_is_noop() {
        let mut sheet = sample_sheet();
        assert!(!sheet.increment(&Account::DeferredTaxLiability, dec!(1_000)));
        assert_eq!(sheet.get(&Account::DeferredTaxLiability), None);

        assert!(sheet.increment(&Account::CashAndEquivalents, dec!(-10_000)));
        assert_eq!(sheet.get(&Account::CashAndEquivalents), Some(dec!(40_000)));
    }

    #[test]
    fn test_upsert_appends_then_adds() {
        let mut sheet = sample_sheet();
        sheet.upsert(Account::DeferredTaxLiability, dec!(6_250));
        assert_eq!(sheet.get(&Account::DeferredTaxLiability), Some(dec!(6_250)));
        // New line lands at the end
        assert_eq!(
            sheet.entries().last().unwrap().account,
            Account::DeferredTaxLiability
        );

        sheet.upsert(Account::DeferredTaxLiability, dec!(1_000));
        assert_eq!(sheet.get(&Account::DeferredTaxLiability), Some(dec!(7_250)));
        assert_eq!(sheet.len(), 10);
    }

    #[test]
    fn test_unclassified_excluded_from_totals() {
        let mut sheet = sample_sheet();
        sheet.upsert(Account::DeferredTaxLiability, dec!(6_250));
        sheet.upsert(Account::Other("Minority Interest".into()), dec!(3_000));
        assert_eq!(sheet.total_liabilities_and_equity(), dec!(180_000));
        assert!(sheet.is_balanced());
    }

    #[test]
    fn test_balance_tolerance() {
        // 1.5 off on 180k is within rtol 1e-5 (limit 1.8)
        let mut near = sample_sheet();
        near.increment(&Account::CashAndEquivalents, dec!(1.5));
        assert!(near.is_balanced());

        // 2.0 off is outside
        let mut off = sample_sheet();
        off.increment(&Account::CashAndEquivalents, dec!(2));
        assert!(!off.is_balanced());

        assert!(BalanceSheet::new().is_balanced());
    }

    #[test]
    fn test_canonicalized_is_idempotent() {
        let shuffled = BalanceSheet::from_entries([
            (Account::ShareholdersEquity, dec!(100_000)),
            (Account::Other("Minority Interest".into()), dec!(1_000)),
            (Account::CashAndEquivalents, dec!(50_000)),
            (Account::DeferredTaxLiability, dec!(6_250)),
            (Account::LongTermDebt, dec!(60_000)),
        ])
        .unwrap();

        let once = shuffled.canonicalized();
        let accounts: Vec<&Account> = once.entries().iter().map(|e| &e.account).collect();
        assert_eq!(
            accounts,
            vec![
                &Account::CashAndEquivalents,
                &Account::LongTermDebt,
                &Account::ShareholdersEquity,
                // Non-taxonomy accounts keep their relative order, last
                &Account::Other("Minority Interest".into()),
                &Account::DeferredTaxLiability,
            ]
        );

        let twice = once.canonicalized();
        assert_eq!(once, twice);
    }
}
