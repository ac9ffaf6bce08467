use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;

use crate::db::{get_connection, DbPool};
use crate::errors::{Error, Result};
use crate::schema::ledger_entries;

use super::ledger_model::{
    LedgerEntry, LedgerEntryDB, NewLedgerEntry, LEDGER_STATUS_COMPLETED,
};

/// Contract for the append-only ledger.
pub trait LedgerRepositoryTrait: Send + Sync {
    /// Appends a completed entry inside an open transaction.
    fn insert_in_tx(&self, conn: &mut SqliteConnection, entry: NewLedgerEntry) -> Result<LedgerEntry>;

    /// Lists a user's ledger entries, most recent first.
    fn list_for_user(&self, user_id: &str) -> Result<Vec<LedgerEntry>>;
}

pub struct LedgerRepository {
    pool: Arc<DbPool>,
}

impl LedgerRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

impl LedgerRepositoryTrait for LedgerRepository {
    fn insert_in_tx(&self, conn: &mut SqliteConnection, entry: NewLedgerEntry) -> Result<LedgerEntry> {
        let entry_db = LedgerEntryDB {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: entry.user_id,
            entry_type: entry.entry_type.as_str().to_string(),
            amount: entry.amount.to_string(),
            description: entry.description,
            status: LEDGER_STATUS_COMPLETED.to_string(),
            created_at: Utc::now().naive_utc(),
        };

        diesel::insert_into(ledger_entries::table)
            .values(&entry_db)
            .execute(conn)?;

        Ok(entry_db.into())
    }

    fn list_for_user(&self, user_id: &str) -> Result<Vec<LedgerEntry>> {
        let mut conn = get_connection(&self.pool)?;
        ledger_entries::table
            .filter(ledger_entries::user_id.eq(user_id))
            .order(ledger_entries::created_at.desc())
            .load::<LedgerEntryDB>(&mut conn)
            .map(|results| results.into_iter().map(LedgerEntry::from).collect())
            .map_err(Error::from)
    }
}
