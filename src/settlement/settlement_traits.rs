//! Settlement service trait.

use async_trait::async_trait;

use super::settlement_model::{InvestmentReceipt, InvestmentRequest};
use crate::errors::Result;
use crate::identity::CallerIdentity;

/// Contract for executing a single investment settlement.
#[async_trait]
pub trait SettlementServiceTrait: Send + Sync {
    /// Atomically moves `amount` from the investor's wallet into the
    /// product's funding balance.
    ///
    /// Four mutations commit together or not at all: wallet debit, ledger
    /// entry, product funding increment, investment record. The wallet is
    /// re-read inside the transaction (freshness read) so the balance
    /// check holds at commit time, not at request time.
    async fn invest(
        &self,
        caller: Option<&CallerIdentity>,
        request: InvestmentRequest,
    ) -> Result<InvestmentReceipt>;
}
