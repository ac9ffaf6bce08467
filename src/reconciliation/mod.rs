// Module declarations
pub(crate) mod reconciliation_model;
pub(crate) mod reconciliation_service;

// Re-export the public interface
pub use reconciliation_model::ReconciliationSummary;
pub use reconciliation_service::{ReconciliationService, ReconciliationServiceTrait};
