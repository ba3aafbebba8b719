use std::collections::HashMap;

use crate::error::ConsolidationError;
use crate::ledger::{Account, BalanceSheet};
use crate::types::Money;
use crate::ConsolResult;

// ---------------------------------------------------------------------------
// Combiner
// ---------------------------------------------------------------------------

/// Combines the acquirer's and target's balance sheets into one ledger,
/// eliminating intercompany balances.
///
/// Both source ledgers must individually satisfy the accounting
/// equation; this is checked once at construction so combination can
/// assume well-formed inputs.
#[derive(Debug, Clone)]
pub struct BalanceSheetCombiner {
    acquirer: BalanceSheet,
    target: BalanceSheet,
}

impl BalanceSheetCombiner {
    pub fn new(acquirer: BalanceSheet, target: BalanceSheet) -> ConsolResult<Self> {
        validate_balanced("Acquirer", &acquirer)?;
        validate_balanced("Target", &target)?;
        Ok(Self { acquirer, target })
    }

    pub fn acquirer(&self) -> &BalanceSheet {
        &self.acquirer
    }

    pub fn target(&self) -> &BalanceSheet {
        &self.target
    }

    /// Sum the two ledgers account-by-account, in the acquirer's
    /// account order. Every acquirer account must also exist on the
    /// target side (same account universe). Each intercompany balance
    /// is subtracted exactly once from its account's combined total.
    pub fn combine(
        &self,
        intercompany_balances: Option<&HashMap<Account, Money>>,
    ) -> ConsolResult<BalanceSheet> {
        let mut combined = BalanceSheet::new();

        for entry in &self.acquirer {
            let target_amount = self.target.get(&entry.account).ok_or_else(|| {
                ConsolidationError::MissingAccount {
                    account: entry.account.name().to_string(),
                    context: "target balance sheet".into(),
                }
            })?;

            let elimination = intercompany_balances
                .and_then(|balances| balances.get(&entry.account).copied())
                .unwrap_or(Money::ZERO);

            combined.upsert(entry.account.clone(), entry.amount + target_amount - elimination);
        }

        Ok(combined)
    }

    /// Re-check the accounting equation on an already-combined ledger.
    pub fn verify(sheet: &BalanceSheet) -> bool {
        sheet.is_balanced()
    }
}

fn validate_balanced(side: &str, sheet: &BalanceSheet) -> ConsolResult<()> {
    if sheet.is_balanced() {
        Ok(())
    } else {
        Err(ConsolidationError::Unbalanced {
            side: side.to_string(),
            assets: sheet.total_assets(),
            liabilities_and_equity: sheet.total_liabilities_and_equity(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
