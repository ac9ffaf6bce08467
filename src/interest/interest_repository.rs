use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;

use crate::constants::RATE_SETTINGS_ID;
use crate::db::{get_connection, DbPool};
use crate::errors::{Error, Result};
use crate::schema::{interest_history, interest_rate_settings};

use super::interest_model::{
    InterestHistoryRecord, InterestHistoryRecordDB, NewInterestHistoryRecord, RateSettings,
    RateSettingsDB,
};

/// Contract for rate settings and accrual history persistence.
pub trait InterestRepositoryTrait: Send + Sync {
    /// Reads the singleton rate settings document (seeded by migration).
    fn get_settings(&self) -> Result<RateSettings>;

    /// Reads the settings document inside an open transaction, so an
    /// accrual run sees the rate consistent with its wallet snapshot.
    fn get_settings_in_tx(&self, conn: &mut SqliteConnection) -> Result<RateSettings>;

    /// Persists the settings document, stamping `last_updated`.
    fn save_settings(&self, settings: &RateSettings) -> Result<RateSettings>;

    /// Appends one accrual record inside an open transaction.
    fn insert_history_in_tx(
        &self,
        conn: &mut SqliteConnection,
        record: NewInterestHistoryRecord,
    ) -> Result<InterestHistoryRecord>;

    /// Lists a wallet's accrual history, most recent first.
    fn list_history_for_wallet(&self, wallet_id: &str) -> Result<Vec<InterestHistoryRecord>>;
}

pub struct InterestRepository {
    pool: Arc<DbPool>,
}

impl InterestRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    fn load_settings(conn: &mut SqliteConnection) -> Result<RateSettings> {
        interest_rate_settings::table
            .find(RATE_SETTINGS_ID)
            .first::<RateSettingsDB>(conn)
            .map(RateSettings::from)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => Error::NotFound(
                    "Interest rate settings document is missing".to_string(),
                ),
                _ => e.into(),
            })
    }
}

impl InterestRepositoryTrait for InterestRepository {
    fn get_settings(&self) -> Result<RateSettings> {
        let mut conn = get_connection(&self.pool)?;
        Self::load_settings(&mut conn)
    }

    fn get_settings_in_tx(&self, conn: &mut SqliteConnection) -> Result<RateSettings> {
        Self::load_settings(conn)
    }

    fn save_settings(&self, settings: &RateSettings) -> Result<RateSettings> {
        let market_data_json = settings
            .market_data
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let row = RateSettingsDB {
            id: RATE_SETTINGS_ID.to_string(),
            daily_rate: settings.daily_rate.to_string(),
            use_market_rate: settings.use_market_rate,
            manual_rate_offset: settings.manual_rate_offset.to_string(),
            market_data: market_data_json,
            min_balance: settings.min_balance.to_string(),
            last_updated: Utc::now().naive_utc(),
        };

        let mut conn = get_connection(&self.pool)?;
        diesel::update(interest_rate_settings::table.find(RATE_SETTINGS_ID))
            .set(&row)
            .execute(&mut conn)?;

        Ok(row.into())
    }

    fn insert_history_in_tx(
        &self,
        conn: &mut SqliteConnection,
        record: NewInterestHistoryRecord,
    ) -> Result<InterestHistoryRecord> {
        let row = InterestHistoryRecordDB {
            id: uuid::Uuid::new_v4().to_string(),
            wallet_id: record.wallet_id,
            amount: record.amount.to_string(),
            rate: record.rate.to_string(),
            previous_balance: record.previous_balance.to_string(),
            new_balance: record.new_balance.to_string(),
            created_at: Utc::now().naive_utc(),
        };

        diesel::insert_into(interest_history::table)
            .values(&row)
            .execute(conn)?;

        Ok(row.into())
    }

    fn list_history_for_wallet(&self, wallet_id: &str) -> Result<Vec<InterestHistoryRecord>> {
        let mut conn = get_connection(&self.pool)?;
        interest_history::table
            .filter(interest_history::wallet_id.eq(wallet_id))
            .order(interest_history::created_at.desc())
            .load::<InterestHistoryRecordDB>(&mut conn)
            .map(|results| {
                results
                    .into_iter()
                    .map(InterestHistoryRecord::from)
                    .collect()
            })
            .map_err(Error::from)
    }
}
