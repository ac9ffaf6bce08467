// Module declarations
pub(crate) mod investments_model;
pub(crate) mod investments_repository;
pub(crate) mod investments_traits;

// Re-export the public interface
pub use investments_model::{
    Investment, InvestmentDB, NewInvestment, INVESTMENT_STATUS_ACTIVE,
};
pub use investments_repository::InvestmentRepository;
pub use investments_traits::InvestmentRepositoryTrait;
