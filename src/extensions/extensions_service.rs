use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime, Utc};
use log::{info, warn};
use serde_json::json;
use std::sync::Arc;

use super::extensions_model::{
    ExtensionOutcome, ExtensionRunSummary, TrendData, TrendThresholds,
};
use crate::constants::{
    AUTO_EXTENSION_HORIZON_DAYS, EXTENSION_DAYS, MANUAL_EXTENSION_LIMIT, TREND_WINDOW_DAYS,
};
use crate::db::DbTransactionExecutor;
use crate::errors::{Error, Result};
use crate::identity::{require_caller, CallerIdentity};
use crate::investments::InvestmentRepositoryTrait;
use crate::notifications::{
    NewNotification, NotificationRepositoryTrait, NOTIFICATION_KIND_DEADLINE_EXTENDED,
};
use crate::products::{ExtensionRecord, Product, ProductRepositoryTrait, ProductStatus};
use crate::system_logs::{
    SystemLogRepositoryTrait, LOG_TYPE_MANUAL_EXTENSION, LOG_TYPE_TREND_EXTENSION,
};

/// Contract for trend-based deadline extensions.
#[async_trait]
pub trait ExtensionServiceTrait: Send + Sync {
    /// Daily job: extends trending products whose deadline is near.
    ///
    /// A product can be extended again on any later run while it keeps
    /// trending; the automatic path carries no lifetime cap.
    async fn run_auto_extension(&self, now: Option<NaiveDateTime>) -> Result<ExtensionRunSummary>;

    /// Designer-invoked request against lower thresholds, usable at most
    /// once per product.
    async fn request_extension(
        &self,
        caller: Option<&CallerIdentity>,
        product_id: &str,
    ) -> Result<ExtensionOutcome>;
}

pub struct ExtensionService<E: DbTransactionExecutor + Send + Sync> {
    product_repository: Arc<dyn ProductRepositoryTrait>,
    investment_repository: Arc<dyn InvestmentRepositoryTrait>,
    notification_repository: Arc<dyn NotificationRepositoryTrait>,
    system_log_repository: Arc<dyn SystemLogRepositoryTrait>,
    transaction_executor: E,
}

impl<E: DbTransactionExecutor + Send + Sync> ExtensionService<E> {
    pub fn new(
        product_repository: Arc<dyn ProductRepositoryTrait>,
        investment_repository: Arc<dyn InvestmentRepositoryTrait>,
        notification_repository: Arc<dyn NotificationRepositoryTrait>,
        system_log_repository: Arc<dyn SystemLogRepositoryTrait>,
        transaction_executor: E,
    ) -> Self {
        Self {
            product_repository,
            investment_repository,
            notification_repository,
            system_log_repository,
            transaction_executor,
        }
    }

    /// Computes a product's trailing-window activity against the given
    /// thresholds.
    fn collect_trend_data(
        &self,
        product_id: &str,
        now: NaiveDateTime,
        thresholds: &TrendThresholds,
    ) -> Result<TrendData> {
        let window_start = now - Duration::days(TREND_WINDOW_DAYS);
        let recent_views = self
            .product_repository
            .count_views_since(product_id, window_start)?;
        let recent_investments = self
            .investment_repository
            .count_for_product_since(product_id, window_start)?;
        let total_invested = self
            .investment_repository
            .sum_for_product_since(product_id, window_start)?;

        Ok(TrendData::evaluate(
            recent_views,
            recent_investments,
            total_invested,
            thresholds,
        ))
    }

    /// Extends one product's deadline and stages the designer
    /// notification, atomically.
    fn extend_product(
        &self,
        product: &Product,
        now: NaiveDateTime,
        reason: String,
        requested_by: Option<String>,
    ) -> Result<NaiveDateTime> {
        let new_deadline = product.deadline + Duration::days(EXTENSION_DAYS);
        let product_repository = self.product_repository.clone();
        let notification_repository = self.notification_repository.clone();

        let product_id = product.id.clone();
        let designer_id = product.designer_id.clone();
        let product_name = product.name.clone();
        let previous_deadline = product.deadline;
        let count_as_manual = requested_by.is_some();

        self.transaction_executor.execute(move |tx_conn| {
            // Freshness read: the product may have been archived or
            // extended since the pre-checks ran outside the transaction.
            let current = product_repository.get_by_id_in_tx(tx_conn, &product_id)?;
            if current.status != ProductStatus::Active {
                return Err(Error::Precondition(format!(
                    "Product {} is not active (status: {})",
                    product_id, current.status
                )));
            }
            if current.deadline != previous_deadline {
                return Err(Error::Precondition(format!(
                    "Product {} deadline moved to {} while the extension was in flight",
                    product_id, current.deadline
                )));
            }
            if count_as_manual && current.manual_extension_count >= MANUAL_EXTENSION_LIMIT {
                return Err(Error::Precondition(format!(
                    "Product {} has already used its manual extension",
                    product_id
                )));
            }

            product_repository.extend_deadline_in_tx(
                tx_conn,
                &product_id,
                ExtensionRecord {
                    previous_deadline,
                    new_deadline,
                    reason: reason.clone(),
                    requested_by: requested_by.clone(),
                    timestamp: now,
                },
                count_as_manual,
            )?;

            notification_repository.insert_in_tx(
                tx_conn,
                NewNotification {
                    user_id: designer_id.clone(),
                    title: "Funding deadline extended".to_string(),
                    message: format!(
                        "{} got {} more days: {}",
                        product_name, EXTENSION_DAYS, reason
                    ),
                    kind: NOTIFICATION_KIND_DEADLINE_EXTENDED.to_string(),
                    product_id: Some(product_id.clone()),
                },
            )?;

            Ok(new_deadline)
        })
    }
}

#[async_trait]
impl<E: DbTransactionExecutor + Send + Sync> ExtensionServiceTrait for ExtensionService<E> {
    async fn run_auto_extension(&self, now: Option<NaiveDateTime>) -> Result<ExtensionRunSummary> {
        let now = now.unwrap_or_else(|| Utc::now().naive_utc());
        let horizon = now + Duration::days(AUTO_EXTENSION_HORIZON_DAYS);
        let thresholds = TrendThresholds::auto();

        let candidates = self
            .product_repository
            .list_active_deadline_within(now, horizon)?;
        let products_scanned = candidates.len();
        info!(
            "Trend extension scan: {} products with deadlines before {}",
            products_scanned, horizon
        );

        let mut products_extended = 0usize;
        for product in candidates {
            let trend = self.collect_trend_data(&product.id, now, &thresholds)?;
            if !trend.is_trending() {
                continue;
            }

            let reason = trend.reasons().join(", ");
            match self.extend_product(&product, now, reason, None) {
                Ok(new_deadline) => {
                    info!(
                        "Extended product {} to {} (trending)",
                        product.id, new_deadline
                    );
                    products_extended += 1;
                }
                Err(e) => {
                    // One product failing to extend should not abort the
                    // rest of the scan.
                    warn!("Failed to extend product {}: {}", product.id, e);
                }
            }
        }

        self.system_log_repository.insert(
            LOG_TYPE_TREND_EXTENSION,
            json!({
                "productsScanned": products_scanned,
                "productsExtended": products_extended,
            }),
        )?;

        Ok(ExtensionRunSummary {
            products_scanned,
            products_extended,
        })
    }

    async fn request_extension(
        &self,
        caller: Option<&CallerIdentity>,
        product_id: &str,
    ) -> Result<ExtensionOutcome> {
        let caller = require_caller(caller)?;
        let now = Utc::now().naive_utc();

        let product = self.product_repository.get_by_id(product_id)?;
        if product.designer_id != caller.user_id {
            return Err(Error::Authorization(format!(
                "Only the designer of product {} may request an extension",
                product_id
            )));
        }
        if product.status != ProductStatus::Active {
            return Err(Error::Precondition(format!(
                "Product {} is not active (status: {})",
                product_id, product.status
            )));
        }
        if product.deadline <= now {
            return Err(Error::Precondition(format!(
                "Product {} deadline has already passed",
                product_id
            )));
        }
        if product.manual_extension_count >= MANUAL_EXTENSION_LIMIT {
            return Err(Error::Precondition(format!(
                "Product {} has already used its manual extension",
                product_id
            )));
        }

        let thresholds = TrendThresholds::manual();
        let trend = self.collect_trend_data(product_id, now, &thresholds)?;
        if !trend.is_trending() {
            return Ok(ExtensionOutcome {
                success: false,
                message: "Product activity is below the extension thresholds".to_string(),
                trend_data: trend,
                new_deadline: None,
            });
        }

        let reason = trend.reasons().join(", ");
        let new_deadline =
            self.extend_product(&product, now, reason, Some(caller.user_id.clone()))?;

        self.system_log_repository.insert(
            LOG_TYPE_MANUAL_EXTENSION,
            json!({
                "productId": product_id,
                "requestedBy": caller.user_id,
                "newDeadline": new_deadline.to_string(),
            }),
        )?;

        Ok(ExtensionOutcome {
            success: true,
            message: format!("Deadline extended by {} days", EXTENSION_DAYS),
            trend_data: trend,
            new_deadline: Some(new_deadline),
        })
    }
}
