pub mod account;
pub mod balance_sheet;

pub use account::{Account, AccountClass};
pub use balance_sheet::BalanceSheet;
