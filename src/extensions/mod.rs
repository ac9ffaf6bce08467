// Module declarations
pub(crate) mod extensions_model;
pub(crate) mod extensions_service;

// Re-export the public interface
pub use extensions_model::{
    ExtensionOutcome, ExtensionRunSummary, MetricComparison, TrendData, TrendThresholds,
};
pub use extensions_service::{ExtensionService, ExtensionServiceTrait};
