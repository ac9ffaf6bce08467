use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;

use super::settlement_model::{InvestmentReceipt, InvestmentRequest};
use super::settlement_traits::SettlementServiceTrait;
use crate::db::DbTransactionExecutor;
use crate::errors::{Error, Result};
use crate::identity::{require_caller, CallerIdentity, IdentityProviderTrait, Role};
use crate::investments::{InvestmentRepositoryTrait, NewInvestment};
use crate::ledger::{EntryType, LedgerRepositoryTrait, NewLedgerEntry};
use crate::products::ProductRepositoryTrait;
use crate::wallets::WalletRepositoryTrait;

/// Service executing investment settlements (generic over executor).
pub struct SettlementService<E: DbTransactionExecutor + Send + Sync> {
    wallet_repository: Arc<dyn WalletRepositoryTrait>,
    product_repository: Arc<dyn ProductRepositoryTrait>,
    investment_repository: Arc<dyn InvestmentRepositoryTrait>,
    ledger_repository: Arc<dyn LedgerRepositoryTrait>,
    identity_provider: Arc<dyn IdentityProviderTrait>,
    transaction_executor: E,
}

impl<E: DbTransactionExecutor + Send + Sync> SettlementService<E> {
    pub fn new(
        wallet_repository: Arc<dyn WalletRepositoryTrait>,
        product_repository: Arc<dyn ProductRepositoryTrait>,
        investment_repository: Arc<dyn InvestmentRepositoryTrait>,
        ledger_repository: Arc<dyn LedgerRepositoryTrait>,
        identity_provider: Arc<dyn IdentityProviderTrait>,
        transaction_executor: E,
    ) -> Self {
        Self {
            wallet_repository,
            product_repository,
            investment_repository,
            ledger_repository,
            identity_provider,
            transaction_executor,
        }
    }
}

#[async_trait]
impl<E: DbTransactionExecutor + Send + Sync> SettlementServiceTrait for SettlementService<E> {
    async fn invest(
        &self,
        caller: Option<&CallerIdentity>,
        request: InvestmentRequest,
    ) -> Result<InvestmentReceipt> {
        // Preconditions run before any mutation; failures here leave no
        // partial effect.
        let caller = require_caller(caller)?;
        if caller.user_id != request.user_id {
            return Err(Error::Authorization(format!(
                "Caller {} may not invest on behalf of user {}",
                caller.user_id, request.user_id
            )));
        }

        request.validate()?;

        let investor = self
            .identity_provider
            .resolve(&request.user_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("User {} not found", request.user_id)))?;
        if !investor.has_role(Role::Investor) {
            return Err(Error::Authorization(format!(
                "User {} does not hold the investor role",
                request.user_id
            )));
        }

        let product = self.product_repository.get_by_id(&request.product_id)?;
        if !product.status.accepts_investment() {
            return Err(Error::Precondition(format!(
                "Product {} is not open for investment (status: {})",
                product.id, product.status
            )));
        }

        debug!(
            "Settling investment: user {} -> product {} ({})",
            request.user_id, request.product_id, request.amount
        );

        // Clones for the transaction closure
        let wallet_repository = self.wallet_repository.clone();
        let product_repository = self.product_repository.clone();
        let investment_repository = self.investment_repository.clone();
        let ledger_repository = self.ledger_repository.clone();
        let request_for_tx = request.clone();

        let receipt = self.transaction_executor.execute(move |tx_conn| {
            // Freshness read: the balance check must see any concurrent
            // debit committed since the request was made.
            let wallet = wallet_repository.get_by_user_id_in_tx(tx_conn, &request_for_tx.user_id)?;
            if wallet.balance < request_for_tx.amount {
                return Err(Error::InsufficientFunds {
                    requested: request_for_tx.amount,
                    available: wallet.balance,
                });
            }

            let new_balance = wallet.balance - request_for_tx.amount;
            wallet_repository.set_balance_in_tx(tx_conn, &wallet.id, new_balance)?;

            ledger_repository.insert_in_tx(
                tx_conn,
                NewLedgerEntry {
                    user_id: request_for_tx.user_id.clone(),
                    entry_type: EntryType::Debit,
                    amount: request_for_tx.amount,
                    description: format!("Investment in {}", request_for_tx.product_name),
                },
            )?;

            // The product is also re-read inside the transaction: a
            // reconciliation run may have archived it since the check
            // above, and funding is frozen once archived.
            let product =
                product_repository.get_by_id_in_tx(tx_conn, &request_for_tx.product_id)?;
            if !product.status.accepts_investment() {
                return Err(Error::Precondition(format!(
                    "Product {} is not open for investment (status: {})",
                    product.id, product.status
                )));
            }
            product_repository.set_funding_in_tx(
                tx_conn,
                &product.id,
                product.current_funding + request_for_tx.amount,
            )?;

            let investment = investment_repository.create_in_tx(
                tx_conn,
                NewInvestment {
                    user_id: request_for_tx.user_id.clone(),
                    product_id: request_for_tx.product_id.clone(),
                    amount: request_for_tx.amount,
                },
            )?;

            Ok(InvestmentReceipt {
                investment_id: investment.id,
                new_balance,
                message: "Investment completed successfully".to_string(),
            })
        })?;

        info!(
            "Investment {} settled: user {} funded product {} with {}",
            receipt.investment_id, request.user_id, request.product_id, request.amount
        );
        Ok(receipt)
    }
}
