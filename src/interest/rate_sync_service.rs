use async_trait::async_trait;
use chrono::Utc;
use log::{info, warn};
use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;
use std::sync::Arc;

use super::benchmark_provider::BenchmarkRateProvider;
use super::interest_constants::{
    BACKUP_POLICY_RATE, BACKUP_TREASURY_1Y, DAYS_PER_YEAR, INDICATOR_POLICY_RATE,
    INDICATOR_SOURCE_BACKUP, INDICATOR_TREASURY_1Y, RATE_SPREAD,
};
use super::interest_model::{
    IndicatorSnapshot, MarketSnapshot, RateOverrides, RateSettings, RateSyncOutcome,
};
use super::interest_repository::InterestRepositoryTrait;
use crate::constants::RATE_DECIMAL_PRECISION;
use crate::errors::Result;
use crate::identity::{require_caller, require_role, CallerIdentity, Role};
use crate::system_logs::{SystemLogRepositoryTrait, LOG_TYPE_MARKET_RATE_SYNC};

/// Contract for the daily market rate sync job.
#[async_trait]
pub trait RateSyncServiceTrait: Send + Sync {
    /// Scheduled variant: derives the daily rate from the benchmark
    /// indicators and stores it, unless the platform is in manual-rate
    /// mode (`use_market_rate == false`), in which case nothing is
    /// written.
    async fn run_sync(&self) -> Result<RateSyncOutcome>;

    /// Admin-triggered variant: applies the supplied overrides to the
    /// settings first, then performs the identical computation.
    async fn update_market_rates(
        &self,
        caller: Option<&CallerIdentity>,
        overrides: RateOverrides,
    ) -> Result<RateSyncOutcome>;
}

/// Derives `daily_rate` from an annual benchmark rate, spread and manual
/// offset, all in percentage points: `(benchmark + spread + offset) / 365
/// / 100`.
pub fn compute_daily_rate(policy_rate: Decimal, manual_offset: Decimal) -> Decimal {
    let spread = Decimal::from_str(RATE_SPREAD).unwrap_or_default();
    let annual_percent = policy_rate + spread + manual_offset;
    (annual_percent / Decimal::from(DAYS_PER_YEAR) / Decimal::from(100))
        .round_dp(RATE_DECIMAL_PRECISION)
}

pub struct RateSyncService {
    benchmark_provider: Arc<dyn BenchmarkRateProvider>,
    interest_repository: Arc<dyn InterestRepositoryTrait>,
    system_log_repository: Arc<dyn SystemLogRepositoryTrait>,
}

impl RateSyncService {
    pub fn new(
        benchmark_provider: Arc<dyn BenchmarkRateProvider>,
        interest_repository: Arc<dyn InterestRepositoryTrait>,
        system_log_repository: Arc<dyn SystemLogRepositoryTrait>,
    ) -> Self {
        Self {
            benchmark_provider,
            interest_repository,
            system_log_repository,
        }
    }

    /// Fetches one indicator, replacing any upstream failure with its
    /// backup constant so the sync never fails on unavailability alone.
    async fn fetch_with_backup(&self, indicator: &str, backup: &str) -> IndicatorSnapshot {
        match self.benchmark_provider.fetch_indicator(indicator).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(
                    "Benchmark fetch for '{}' failed ({}); using backup value {}",
                    indicator, e, backup
                );
                IndicatorSnapshot {
                    indicator: indicator.to_string(),
                    value: Decimal::from_str(backup).unwrap_or_default(),
                    as_of: Utc::now().date_naive(),
                    source: INDICATOR_SOURCE_BACKUP.to_string(),
                }
            }
        }
    }

    async fn sync_settings(&self, mut settings: RateSettings) -> Result<RateSyncOutcome> {
        if !settings.use_market_rate {
            info!("Market rate sync skipped: platform is in manual-rate mode");
            return Ok(RateSyncOutcome {
                updated: false,
                daily_rate: settings.daily_rate,
                market_data: settings.market_data,
            });
        }

        let (policy_rate, treasury_1y) = futures::join!(
            self.fetch_with_backup(INDICATOR_POLICY_RATE, BACKUP_POLICY_RATE),
            self.fetch_with_backup(INDICATOR_TREASURY_1Y, BACKUP_TREASURY_1Y),
        );

        let daily_rate = compute_daily_rate(policy_rate.value, settings.manual_rate_offset);
        let snapshot = MarketSnapshot {
            policy_rate: policy_rate.clone(),
            treasury_1y,
            fetched_at: Utc::now().naive_utc(),
        };

        settings.daily_rate = daily_rate;
        settings.market_data = Some(snapshot);
        let saved = self.interest_repository.save_settings(&settings)?;

        self.system_log_repository.insert(
            LOG_TYPE_MARKET_RATE_SYNC,
            json!({
                "dailyRate": daily_rate.to_string(),
                "policyRate": policy_rate.value.to_string(),
                "policySource": policy_rate.source,
                "manualRateOffset": settings.manual_rate_offset.to_string(),
            }),
        )?;

        info!(
            "Market rate sync complete: daily rate {} (policy rate {} from {})",
            daily_rate, policy_rate.value, policy_rate.source
        );

        Ok(RateSyncOutcome {
            updated: true,
            daily_rate,
            market_data: saved.market_data,
        })
    }
}

#[async_trait]
impl RateSyncServiceTrait for RateSyncService {
    async fn run_sync(&self) -> Result<RateSyncOutcome> {
        let settings = self.interest_repository.get_settings()?;
        self.sync_settings(settings).await
    }

    async fn update_market_rates(
        &self,
        caller: Option<&CallerIdentity>,
        overrides: RateOverrides,
    ) -> Result<RateSyncOutcome> {
        let caller = require_caller(caller)?;
        require_role(caller, Role::Admin)?;

        let mut settings = self.interest_repository.get_settings()?;
        if let Some(use_market_rate) = overrides.use_market_rate {
            settings.use_market_rate = use_market_rate;
        }
        if let Some(manual_rate_offset) = overrides.manual_rate_offset {
            settings.manual_rate_offset = manual_rate_offset;
        }
        // The overrides themselves always persist, even when the result
        // is manual-rate mode and no rate is derived.
        let settings = self.interest_repository.save_settings(&settings)?;

        self.sync_settings(settings).await
    }
}
