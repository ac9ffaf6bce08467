// Module declarations
pub(crate) mod accrual_service;
pub(crate) mod benchmark_provider;
pub(crate) mod interest_constants;
pub(crate) mod interest_model;
pub(crate) mod interest_repository;
pub(crate) mod rate_sync_service;


// Re-export the public interface
pub use accrual_service::{AccrualService, AccrualServiceTrait};
pub use benchmark_provider::{BenchmarkError, BenchmarkRateProvider, HttpBenchmarkProvider};
pub use interest_constants::*;
pub use interest_model::{
    AccrualSummary, IndicatorSnapshot, InterestHistoryRecord, MarketSnapshot,
    NewInterestHistoryRecord, RateOverrides, RateSettings, RateSyncOutcome,
};
pub use interest_repository::{InterestRepository, InterestRepositoryTrait};
pub use rate_sync_service::{compute_daily_rate, RateSyncService, RateSyncServiceTrait};
