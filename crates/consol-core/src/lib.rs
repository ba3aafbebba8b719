pub mod consolidation;
pub mod error;
pub mod ledger;
pub mod types;

pub use error::ConsolidationError;
pub use ledger::{Account, AccountClass, BalanceSheet};
pub use types::*;

/// Standard result type for all consolidation operations
pub type ConsolResult<T> = Result<T, ConsolidationError>;
