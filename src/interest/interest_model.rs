//! Interest rate settings and accrual history models.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::parse_decimal_tolerant;

/// The singleton interest configuration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateSettings {
    pub id: String,
    /// Daily interest rate as a decimal fraction, e.g. 0.00014
    pub daily_rate: Decimal,
    /// When false the platform runs on a manually managed rate and the
    /// market sync job leaves the settings untouched
    pub use_market_rate: bool,
    /// Manual offset in annual percentage points added to the benchmark
    pub manual_rate_offset: Decimal,
    /// Snapshot of the benchmark indicators from the last sync
    pub market_data: Option<MarketSnapshot>,
    /// Accrual eligibility floor; wallets below it earn no interest
    pub min_balance: Decimal,
    pub last_updated: NaiveDateTime,
}

/// A fetched (or backup) value of one benchmark indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSnapshot {
    pub indicator: String,
    /// Annual percentage points
    pub value: Decimal,
    pub as_of: NaiveDate,
    /// "market" when fetched, "backup" when the fallback constant was used
    pub source: String,
}

/// The benchmark snapshot persisted alongside the derived daily rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub policy_rate: IndicatorSnapshot,
    pub treasury_1y: IndicatorSnapshot,
    pub fetched_at: NaiveDateTime,
}

/// Caller-supplied overrides for the admin-triggered manual sync variant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateOverrides {
    pub use_market_rate: Option<bool>,
    pub manual_rate_offset: Option<Decimal>,
}

/// Result of one market rate sync run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateSyncOutcome {
    /// False when the run was skipped because `use_market_rate` is off
    pub updated: bool,
    pub daily_rate: Decimal,
    pub market_data: Option<MarketSnapshot>,
}

/// One wallet's interest accrual, immutable, one per wallet per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestHistoryRecord {
    pub id: String,
    pub wallet_id: String,
    pub amount: Decimal,
    pub rate: Decimal,
    pub previous_balance: Decimal,
    pub new_balance: Decimal,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewInterestHistoryRecord {
    pub wallet_id: String,
    pub amount: Decimal,
    pub rate: Decimal,
    pub previous_balance: Decimal,
    pub new_balance: Decimal,
}

/// Summary of one accrual run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccrualSummary {
    pub wallets_scanned: usize,
    pub wallets_credited: usize,
    pub total_interest: Decimal,
    pub daily_rate: Decimal,
}

/// Database model for the rate settings singleton
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::interest_rate_settings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RateSettingsDB {
    pub id: String,
    pub daily_rate: String,
    pub use_market_rate: bool,
    pub manual_rate_offset: String,
    pub market_data: Option<String>,
    pub min_balance: String,
    pub last_updated: NaiveDateTime,
}

impl From<RateSettingsDB> for RateSettings {
    fn from(db: RateSettingsDB) -> Self {
        let market_data = db.market_data.as_deref().and_then(|raw| {
            serde_json::from_str::<MarketSnapshot>(raw)
                .map_err(|e| {
                    warn!("Ignoring unparseable market snapshot: {}", e);
                    e
                })
                .ok()
        });
        Self {
            id: db.id,
            daily_rate: parse_decimal_tolerant(&db.daily_rate, "rate_settings.daily_rate"),
            use_market_rate: db.use_market_rate,
            manual_rate_offset: parse_decimal_tolerant(
                &db.manual_rate_offset,
                "rate_settings.manual_rate_offset",
            ),
            market_data,
            min_balance: parse_decimal_tolerant(&db.min_balance, "rate_settings.min_balance"),
            last_updated: db.last_updated,
        }
    }
}

/// Database model for interest history
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::interest_history)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct InterestHistoryRecordDB {
    pub id: String,
    pub wallet_id: String,
    pub amount: String,
    pub rate: String,
    pub previous_balance: String,
    pub new_balance: String,
    pub created_at: NaiveDateTime,
}

impl From<InterestHistoryRecordDB> for InterestHistoryRecord {
    fn from(db: InterestHistoryRecordDB) -> Self {
        Self {
            id: db.id,
            wallet_id: db.wallet_id,
            amount: parse_decimal_tolerant(&db.amount, "interest_history.amount"),
            rate: parse_decimal_tolerant(&db.rate, "interest_history.rate"),
            previous_balance: parse_decimal_tolerant(
                &db.previous_balance,
                "interest_history.previous_balance",
            ),
            new_balance: parse_decimal_tolerant(&db.new_balance, "interest_history.new_balance"),
            created_at: db.created_at,
        }
    }
}
