//! Wallet repository trait.
//!
//! Mutating methods come in pool-backed and `_in_tx` flavors; the `_in_tx`
//! methods run on a caller-supplied transaction connection so that
//! multi-table units of work commit atomically.

use diesel::SqliteConnection;
use rust_decimal::Decimal;

use super::wallets_model::{NewWallet, Wallet};
use crate::errors::Result;

pub trait WalletRepositoryTrait: Send + Sync {
    /// Creates a new wallet.
    fn create(&self, new_wallet: NewWallet) -> Result<Wallet>;

    /// Retrieves a wallet by its owning user.
    fn get_by_user_id(&self, user_id: &str) -> Result<Wallet>;

    /// Freshness read: re-reads the wallet inside an open transaction so
    /// balance checks never rely on data read before the transaction began.
    fn get_by_user_id_in_tx(&self, conn: &mut SqliteConnection, user_id: &str) -> Result<Wallet>;

    /// Lists every wallet, inside an open transaction (accrual scan).
    fn list_all_in_tx(&self, conn: &mut SqliteConnection) -> Result<Vec<Wallet>>;

    /// Writes a new balance and touches `updated_at`, inside an open
    /// transaction.
    fn set_balance_in_tx(
        &self,
        conn: &mut SqliteConnection,
        wallet_id: &str,
        new_balance: Decimal,
    ) -> Result<()>;
}
