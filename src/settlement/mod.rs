// Module declarations
pub(crate) mod settlement_model;
pub(crate) mod settlement_service;
pub(crate) mod settlement_traits;

// Re-export the public interface
pub use settlement_model::{InvestmentReceipt, InvestmentRequest};
pub use settlement_service::SettlementService;
pub use settlement_traits::SettlementServiceTrait;
