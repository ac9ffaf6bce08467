use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use log::info;
use serde_json::json;
use std::sync::Arc;

use super::reconciliation_model::ReconciliationSummary;
use crate::db::DbTransactionExecutor;
use crate::errors::Result;
use crate::identity::{require_caller, require_role, CallerIdentity, Role};
use crate::notifications::{
    NewNotification, NotificationRepositoryTrait, NOTIFICATION_KIND_PRODUCT_ARCHIVED,
};
use crate::products::{ProductRepositoryTrait, ARCHIVE_REASON_GOAL_NOT_MET};
use crate::system_logs::{SystemLogRepositoryTrait, LOG_TYPE_DEADLINE_RECONCILIATION};

/// Contract for the daily deadline reconciliation job.
#[async_trait]
pub trait ReconciliationServiceTrait: Send + Sync {
    /// Archives active products past their deadline that missed their
    /// funding goal, notifying each designer. Archive updates and
    /// notifications commit as one batch. Re-running is a no-op: archived
    /// products no longer match the `active` scan.
    async fn run_reconciliation(
        &self,
        as_of: Option<NaiveDateTime>,
    ) -> Result<ReconciliationSummary>;

    /// Admin-triggered variant with an optional override "as-of" instant.
    async fn run_manual(
        &self,
        caller: Option<&CallerIdentity>,
        override_date: Option<NaiveDateTime>,
    ) -> Result<ReconciliationSummary>;
}

/// Scheduled job reconciling product lifecycle state against deadlines.
pub struct ReconciliationService<E: DbTransactionExecutor + Send + Sync> {
    product_repository: Arc<dyn ProductRepositoryTrait>,
    notification_repository: Arc<dyn NotificationRepositoryTrait>,
    system_log_repository: Arc<dyn SystemLogRepositoryTrait>,
    transaction_executor: E,
}

impl<E: DbTransactionExecutor + Send + Sync> ReconciliationService<E> {
    pub fn new(
        product_repository: Arc<dyn ProductRepositoryTrait>,
        notification_repository: Arc<dyn NotificationRepositoryTrait>,
        system_log_repository: Arc<dyn SystemLogRepositoryTrait>,
        transaction_executor: E,
    ) -> Self {
        Self {
            product_repository,
            notification_repository,
            system_log_repository,
            transaction_executor,
        }
    }
}

#[async_trait]
impl<E: DbTransactionExecutor + Send + Sync> ReconciliationServiceTrait
    for ReconciliationService<E>
{
    async fn run_reconciliation(
        &self,
        as_of: Option<NaiveDateTime>,
    ) -> Result<ReconciliationSummary> {
        let as_of = as_of.unwrap_or_else(|| Utc::now().naive_utc());
        info!("Starting deadline reconciliation as of {}", as_of);

        let product_repository = self.product_repository.clone();
        let notification_repository = self.notification_repository.clone();
        let system_log_repository = self.system_log_repository.clone();

        let summary = self.transaction_executor.execute(move |tx_conn| {
            let expired = product_repository.list_expired_active_in_tx(tx_conn, as_of)?;
            let products_checked = expired.len();

            let mut products_archived = 0usize;
            let mut notifications_sent = 0usize;

            for product in expired {
                // Products that reached their goal by the deadline are
                // left untouched; their transition to funded is owned by
                // another workflow.
                if product.goal_reached() {
                    continue;
                }

                product_repository.archive_in_tx(
                    tx_conn,
                    &product.id,
                    as_of,
                    ARCHIVE_REASON_GOAL_NOT_MET,
                )?;
                products_archived += 1;

                notification_repository.insert_in_tx(
                    tx_conn,
                    NewNotification {
                        user_id: product.designer_id.clone(),
                        title: "Funding period ended".to_string(),
                        message: format!(
                            "{} reached its deadline with {} of {} funded and has been archived.",
                            product.name, product.current_funding, product.funding_goal
                        ),
                        kind: NOTIFICATION_KIND_PRODUCT_ARCHIVED.to_string(),
                        product_id: Some(product.id.clone()),
                    },
                )?;
                notifications_sent += 1;
            }

            system_log_repository.insert_in_tx(
                tx_conn,
                LOG_TYPE_DEADLINE_RECONCILIATION,
                json!({
                    "asOf": as_of.to_string(),
                    "productsChecked": products_checked,
                    "productsArchived": products_archived,
                    "notificationsSent": notifications_sent,
                }),
            )?;

            Ok(ReconciliationSummary {
                as_of,
                products_checked,
                products_archived,
                notifications_sent,
            })
        })?;

        info!(
            "Deadline reconciliation complete: {} checked, {} archived",
            summary.products_checked, summary.products_archived
        );
        Ok(summary)
    }

    async fn run_manual(
        &self,
        caller: Option<&CallerIdentity>,
        override_date: Option<NaiveDateTime>,
    ) -> Result<ReconciliationSummary> {
        let caller = require_caller(caller)?;
        require_role(caller, Role::Admin)?;
        self.run_reconciliation(override_date).await
    }
}
