// Module declarations
pub(crate) mod system_logs_model;
pub(crate) mod system_logs_repository;

// Re-export the public interface
pub use system_logs_model::{
    SystemLog, SystemLogDB, LOG_TYPE_DEADLINE_RECONCILIATION, LOG_TYPE_INTEREST_ACCRUAL,
    LOG_TYPE_MANUAL_EXTENSION, LOG_TYPE_MARKET_RATE_SYNC, LOG_TYPE_TREND_EXTENSION,
};
pub use system_logs_repository::{SystemLogRepository, SystemLogRepositoryTrait};
