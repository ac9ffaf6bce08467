//! Job audit log models.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Log type tags written by the core jobs.
pub const LOG_TYPE_INTEREST_ACCRUAL: &str = "interest_accrual";
pub const LOG_TYPE_MARKET_RATE_SYNC: &str = "market_rate_sync";
pub const LOG_TYPE_DEADLINE_RECONCILIATION: &str = "deadline_reconciliation";
pub const LOG_TYPE_TREND_EXTENSION: &str = "trend_extension";
pub const LOG_TYPE_MANUAL_EXTENSION: &str = "manual_extension";

/// One immutable audit entry per job run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemLog {
    pub id: String,
    pub log_type: String,
    pub payload: Value,
    pub created_at: NaiveDateTime,
}

/// Database model for system logs
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::system_logs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SystemLogDB {
    pub id: String,
    pub log_type: String,
    pub payload: String,
    pub created_at: NaiveDateTime,
}

impl From<SystemLogDB> for SystemLog {
    fn from(db: SystemLogDB) -> Self {
        let payload = serde_json::from_str(&db.payload).unwrap_or(Value::Null);
        Self {
            id: db.id,
            log_type: db.log_type,
            payload,
            created_at: db.created_at,
        }
    }
}
