pub mod adjustments;
pub mod combiner;
pub mod scenario;
pub mod workflow;

pub use adjustments::{AcquisitionAdjustments, AcquisitionConfig, FinancingImpacts, StepUpImpacts};
pub use combiner::BalanceSheetCombiner;
pub use scenario::{
    calculate_metrics, FinancingMix, LeverageMetrics, ScenarioConfig, ScenarioSet, Synergies,
};
pub use workflow::{ConsolidationOutput, ConsolidationWorkflow, ScenarioResult};
