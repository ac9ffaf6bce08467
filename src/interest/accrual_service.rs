use async_trait::async_trait;
use log::{debug, info};
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;

use super::interest_model::{AccrualSummary, NewInterestHistoryRecord};
use super::interest_repository::InterestRepositoryTrait;
use crate::db::DbTransactionExecutor;
use crate::errors::Result;
use crate::system_logs::{SystemLogRepositoryTrait, LOG_TYPE_INTEREST_ACCRUAL};
use crate::utils::round_currency;
use crate::wallets::WalletRepositoryTrait;

/// Contract for the daily interest accrual job.
#[async_trait]
pub trait AccrualServiceTrait: Send + Sync {
    /// Applies one period of interest to every eligible wallet.
    ///
    /// The whole run commits as a single transaction: either every wallet
    /// is credited (with its history record) or none is. Re-running
    /// accrues interest again, so at-most-once invocation per period is
    /// a requirement on the external scheduler, not enforced here. For
    /// very large wallet counts the single transaction is the scaling
    /// limit; per-wallet commits with a period idempotency key would be
    /// the alternative.
    async fn run_accrual(&self) -> Result<AccrualSummary>;
}

/// Scheduled job that credits daily interest to wallet balances.
pub struct AccrualService<E: DbTransactionExecutor + Send + Sync> {
    wallet_repository: Arc<dyn WalletRepositoryTrait>,
    interest_repository: Arc<dyn InterestRepositoryTrait>,
    system_log_repository: Arc<dyn SystemLogRepositoryTrait>,
    transaction_executor: E,
}

impl<E: DbTransactionExecutor + Send + Sync> AccrualService<E> {
    pub fn new(
        wallet_repository: Arc<dyn WalletRepositoryTrait>,
        interest_repository: Arc<dyn InterestRepositoryTrait>,
        system_log_repository: Arc<dyn SystemLogRepositoryTrait>,
        transaction_executor: E,
    ) -> Self {
        Self {
            wallet_repository,
            interest_repository,
            system_log_repository,
            transaction_executor,
        }
    }
}

#[async_trait]
impl<E: DbTransactionExecutor + Send + Sync> AccrualServiceTrait for AccrualService<E> {
    async fn run_accrual(&self) -> Result<AccrualSummary> {
        info!("Starting interest accrual run");

        let wallet_repository = self.wallet_repository.clone();
        let interest_repository = self.interest_repository.clone();
        let system_log_repository = self.system_log_repository.clone();

        let summary = self.transaction_executor.execute(move |tx_conn| {
            // Read the settings inside the transaction so the rate applied
            // matches the wallet snapshot even if an admin saves new
            // settings mid-run.
            let settings = interest_repository.get_settings_in_tx(tx_conn)?;
            let daily_rate = settings.daily_rate;
            let min_balance = settings.min_balance;

            let wallets = wallet_repository.list_all_in_tx(tx_conn)?;
            let wallets_scanned = wallets.len();

            let mut wallets_credited = 0usize;
            let mut total_interest = Decimal::ZERO;

            for wallet in wallets {
                // No negative interest: zero and negative balances are
                // skipped without a history record.
                if wallet.balance <= Decimal::ZERO || wallet.balance < min_balance {
                    debug!("Skipping wallet {} (balance {})", wallet.id, wallet.balance);
                    continue;
                }

                let interest = round_currency(wallet.balance * daily_rate);
                let new_balance = wallet.balance + interest;

                wallet_repository.set_balance_in_tx(tx_conn, &wallet.id, new_balance)?;
                interest_repository.insert_history_in_tx(
                    tx_conn,
                    NewInterestHistoryRecord {
                        wallet_id: wallet.id.clone(),
                        amount: interest,
                        rate: daily_rate,
                        previous_balance: wallet.balance,
                        new_balance,
                    },
                )?;

                wallets_credited += 1;
                total_interest += interest;
            }

            system_log_repository.insert_in_tx(
                tx_conn,
                LOG_TYPE_INTEREST_ACCRUAL,
                json!({
                    "walletsScanned": wallets_scanned,
                    "walletsCredited": wallets_credited,
                    "totalInterest": total_interest.to_string(),
                    "rate": daily_rate.to_string(),
                }),
            )?;

            Ok(AccrualSummary {
                wallets_scanned,
                wallets_credited,
                total_interest,
                daily_rate,
            })
        })?;

        info!(
            "Interest accrual complete: {}/{} wallets credited, total interest {}",
            summary.wallets_credited, summary.wallets_scanned, summary.total_interest
        );
        Ok(summary)
    }
}
