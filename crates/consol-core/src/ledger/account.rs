use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Classification of an account for balance totals and leverage metrics.
///
/// Unclassified accounts (Deferred Tax Liability, anything outside the
/// nine-account taxonomy) are ignored by totals — only the taxonomy
/// accounts participate in the accounting equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountClass {
    Asset,
    Liability,
    Equity,
    Unclassified,
}

/// A balance sheet account.
///
/// The nine taxonomy variants are the closed account universe every
/// source balance sheet must carry. `DeferredTaxLiability` is created
/// by purchase accounting; `Other` holds anything outside the taxonomy
/// (tolerated on input, ignored in totals).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Account {
    CashAndEquivalents,
    AccountsReceivable,
    Inventory,
    PropertyPlantEquipment,
    Goodwill,
    AccountsPayable,
    ShortTermDebt,
    LongTermDebt,
    ShareholdersEquity,
    DeferredTaxLiability,
    Other(String),
}

/// The nine-account taxonomy in display order: assets first, then
/// liabilities and equity.
pub const TAXONOMY: [Account; 9] = [
    Account::CashAndEquivalents,
    Account::AccountsReceivable,
    Account::Inventory,
    Account::PropertyPlantEquipment,
    Account::Goodwill,
    Account::AccountsPayable,
    Account::ShortTermDebt,
    Account::LongTermDebt,
    Account::ShareholdersEquity,
];

impl Account {
    /// Human-readable account name, as used in source files and exports.
    pub fn name(&self) -> &str {
        match self {
            Account::CashAndEquivalents => "Cash and Cash Equivalents",
            Account::AccountsReceivable => "Accounts Receivable",
            Account::Inventory => "Inventory",
            Account::PropertyPlantEquipment => "Property Plant & Equipment",
            Account::Goodwill => "Goodwill",
            Account::AccountsPayable => "Accounts Payable",
            Account::ShortTermDebt => "Short-Term Debt",
            Account::LongTermDebt => "Long-Term Debt",
            Account::ShareholdersEquity => "Shareholders' Equity",
            Account::DeferredTaxLiability => "Deferred Tax Liability",
            Account::Other(name) => name,
        }
    }

    /// Single classification table consumed by every totals/metrics site.
    pub fn class(&self) -> AccountClass {
        match self {
            Account::CashAndEquivalents
            | Account::AccountsReceivable
            | Account::Inventory
            | Account::PropertyPlantEquipment
            | Account::Goodwill => AccountClass::Asset,
            Account::AccountsPayable | Account::ShortTermDebt | Account::LongTermDebt => {
                AccountClass::Liability
            }
            Account::ShareholdersEquity => AccountClass::Equity,
            Account::DeferredTaxLiability | Account::Other(_) => AccountClass::Unclassified,
        }
    }

    /// Position in the canonical display order. Accounts outside the
    /// taxonomy have no rank and sort last.
    pub fn display_rank(&self) -> Option<usize> {
        TAXONOMY.iter().position(|a| a == self)
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for Account {
    fn from(name: &str) -> Self {
        match name {
            "Cash and Cash Equivalents" => Account::CashAndEquivalents,
            "Accounts Receivable" => Account::AccountsReceivable,
            "Inventory" => Account::Inventory,
            "Property Plant & Equipment" => Account::PropertyPlantEquipment,
            "Goodwill" => Account::Goodwill,
            "Accounts Payable" => Account::AccountsPayable,
            "Short-Term Debt" => Account::ShortTermDebt,
            "Long-Term Debt" => Account::LongTermDebt,
            "Shareholders' Equity" => Account::ShareholdersEquity,
            "Deferred Tax Liability" => Account::DeferredTaxLiability,
            other => Account::Other(other.to_string()),
        }
    }
}

impl From<String> for Account {
    fn from(name: String) -> Self {
        Account::from(name.as_str())
    }
}

// Serialize as the display name so JSON maps keyed by account read
// naturally ("Property Plant & Equipment": "20000").
impl Serialize for Account {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Account {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Account::from(name))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
