use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsolidationError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("{side} balance sheet does not balance: assets {assets} vs liabilities + equity {liabilities_and_equity}")]
    Unbalanced {
        side: String,
        assets: Decimal,
        liabilities_and_equity: Decimal,
    },

    #[error("Account '{account}' missing from {context}")]
    MissingAccount { account: String, context: String },

    #[error("Scenario '{0}' not found")]
    ScenarioNotFound(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for ConsolidationError {
    fn from(e: serde_json::Error) -> Self {
        ConsolidationError::SerializationError(e.to_string())
    }
}
