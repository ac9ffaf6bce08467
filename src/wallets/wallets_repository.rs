use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::db::{get_connection, DbPool};
use crate::errors::{Error, Result};
use crate::schema::wallets;
use crate::schema::wallets::dsl::*;

use super::wallets_model::{NewWallet, Wallet, WalletDB};
use super::wallets_traits::WalletRepositoryTrait;

/// Repository for managing wallet data in the database
pub struct WalletRepository {
    pool: Arc<DbPool>,
}

impl WalletRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    fn find_by_user(conn: &mut SqliteConnection, wallet_user_id: &str) -> Result<Wallet> {
        wallets
            .filter(user_id.eq(wallet_user_id))
            .first::<WalletDB>(conn)
            .map(Wallet::from)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => Error::NotFound(format!(
                    "Wallet for user {} not found",
                    wallet_user_id
                )),
                _ => e.into(),
            })
    }
}

impl WalletRepositoryTrait for WalletRepository {
    fn create(&self, new_wallet: NewWallet) -> Result<Wallet> {
        new_wallet.validate()?;

        let now = Utc::now().naive_utc();
        let wallet_db = WalletDB {
            id: new_wallet
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            user_id: new_wallet.user_id,
            balance: new_wallet.balance.to_string(),
            created_at: now,
            updated_at: now,
        };

        let mut conn = get_connection(&self.pool)?;
        diesel::insert_into(wallets::table)
            .values(&wallet_db)
            .execute(&mut conn)?;

        Ok(wallet_db.into())
    }

    fn get_by_user_id(&self, wallet_user_id: &str) -> Result<Wallet> {
        let mut conn = get_connection(&self.pool)?;
        Self::find_by_user(&mut conn, wallet_user_id)
    }

    fn get_by_user_id_in_tx(&self, conn: &mut SqliteConnection, wallet_user_id: &str) -> Result<Wallet> {
        Self::find_by_user(conn, wallet_user_id)
    }

    fn list_all_in_tx(&self, conn: &mut SqliteConnection) -> Result<Vec<Wallet>> {
        wallets
            .order(created_at.asc())
            .load::<WalletDB>(conn)
            .map(|results| results.into_iter().map(Wallet::from).collect())
            .map_err(Error::from)
    }

    fn set_balance_in_tx(
        &self,
        conn: &mut SqliteConnection,
        wallet_id: &str,
        new_balance: Decimal,
    ) -> Result<()> {
        let affected = diesel::update(wallets.find(wallet_id))
            .set((
                balance.eq(new_balance.to_string()),
                updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)?;

        if affected == 0 {
            return Err(Error::NotFound(format!(
                "Wallet with id {} not found",
                wallet_id
            )));
        }

        Ok(())
    }
}
