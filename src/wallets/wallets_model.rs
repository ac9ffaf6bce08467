//! Wallet domain models.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::parse_decimal_tolerant;
use crate::{errors::ValidationError, Error, Result};

/// A user's stored monetary balance.
///
/// Balances are never negative; the settlement service verifies the
/// balance at commit time, and the interest accrual job only ever credits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub id: String,
    pub user_id: String,
    pub balance: Decimal,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a wallet (registration-time, or test seeding).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWallet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: String,
    pub balance: Decimal,
}

impl NewWallet {
    /// Validates the new wallet data
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Wallet user id cannot be empty".to_string(),
            )));
        }
        if self.balance.is_sign_negative() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Wallet balance cannot be negative".to_string(),
            )));
        }
        Ok(())
    }
}

/// Database model for wallets
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::wallets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WalletDB {
    pub id: String,
    pub user_id: String,
    pub balance: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<WalletDB> for Wallet {
    fn from(db: WalletDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            balance: parse_decimal_tolerant(&db.balance, "wallet.balance"),
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
