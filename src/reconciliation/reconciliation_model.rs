//! Deadline reconciliation models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Summary of one reconciliation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationSummary {
    /// Instant the deadlines were compared against
    pub as_of: NaiveDateTime,
    /// Active products found past their deadline
    pub products_checked: usize,
    /// Of those, how many missed their goal and were archived
    pub products_archived: usize,
    /// Designer notifications staged alongside the archive updates
    pub notifications_sent: usize,
}
