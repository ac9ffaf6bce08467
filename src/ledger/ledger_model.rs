//! Append-only wallet ledger entries.
//!
//! Every wallet debit or credit is mirrored by one immutable entry here,
//! written in the same transaction as the balance change.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::parse_decimal_tolerant;

pub const LEDGER_STATUS_COMPLETED: &str = "completed";

/// Direction of a ledger entry relative to the wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Debit,
    Credit,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Debit => "debit",
            EntryType::Credit => "credit",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: String,
    pub user_id: String,
    pub entry_type: String,
    pub amount: Decimal,
    pub description: String,
    pub status: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewLedgerEntry {
    pub user_id: String,
    pub entry_type: EntryType,
    pub amount: Decimal,
    pub description: String,
}

/// Database model for ledger entries
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::ledger_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LedgerEntryDB {
    pub id: String,
    pub user_id: String,
    pub entry_type: String,
    pub amount: String,
    pub description: String,
    pub status: String,
    pub created_at: NaiveDateTime,
}

impl From<LedgerEntryDB> for LedgerEntry {
    fn from(db: LedgerEntryDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            entry_type: db.entry_type,
            amount: parse_decimal_tolerant(&db.amount, "ledger_entry.amount"),
            description: db.description,
            status: db.status,
            created_at: db.created_at,
        }
    }
}
