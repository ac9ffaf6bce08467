//! Trend metrics and extension outcome models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::constants::{
    AUTO_AMOUNT_THRESHOLD, AUTO_INVESTMENTS_THRESHOLD, AUTO_VIEWS_THRESHOLD,
    MANUAL_AMOUNT_THRESHOLD, MANUAL_INVESTMENTS_THRESHOLD, MANUAL_VIEWS_THRESHOLD,
    TREND_WINDOW_DAYS,
};

/// Thresholds a product's trailing-window activity is compared against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendThresholds {
    pub views: i64,
    pub investments: i64,
    pub amount: Decimal,
}

impl TrendThresholds {
    /// Thresholds for the automatic daily extension job.
    pub fn auto() -> Self {
        Self {
            views: AUTO_VIEWS_THRESHOLD,
            investments: AUTO_INVESTMENTS_THRESHOLD,
            amount: Decimal::from_str(AUTO_AMOUNT_THRESHOLD).unwrap_or_default(),
        }
    }

    /// Lower thresholds for the designer-requested manual extension.
    pub fn manual() -> Self {
        Self {
            views: MANUAL_VIEWS_THRESHOLD,
            investments: MANUAL_INVESTMENTS_THRESHOLD,
            amount: Decimal::from_str(MANUAL_AMOUNT_THRESHOLD).unwrap_or_default(),
        }
    }
}

/// One metric's current value against its threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricComparison<T> {
    pub current: T,
    pub threshold: T,
    pub met: bool,
}

/// A product's trailing-window activity, compared per metric, returned to
/// designers so they can see how close they are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendData {
    pub views: MetricComparison<i64>,
    pub investments: MetricComparison<i64>,
    pub amount: MetricComparison<Decimal>,
}

impl TrendData {
    pub fn evaluate(
        recent_views: i64,
        recent_investments: i64,
        total_invested: Decimal,
        thresholds: &TrendThresholds,
    ) -> Self {
        Self {
            views: MetricComparison {
                current: recent_views,
                threshold: thresholds.views,
                met: recent_views >= thresholds.views,
            },
            investments: MetricComparison {
                current: recent_investments,
                threshold: thresholds.investments,
                met: recent_investments >= thresholds.investments,
            },
            amount: MetricComparison {
                current: total_invested,
                threshold: thresholds.amount,
                met: total_invested >= thresholds.amount,
            },
        }
    }

    /// A product is trending when any one metric meets its threshold.
    pub fn is_trending(&self) -> bool {
        self.views.met || self.investments.met || self.amount.met
    }

    /// Human-readable trigger reasons, one per tripped metric.
    pub fn reasons(&self) -> Vec<String> {
        let mut reasons = Vec::new();
        if self.views.met {
            reasons.push(format!(
                "{} views in the last {} days",
                self.views.current, TREND_WINDOW_DAYS
            ));
        }
        if self.investments.met {
            reasons.push(format!(
                "{} investments in the last {} days",
                self.investments.current, TREND_WINDOW_DAYS
            ));
        }
        if self.amount.met {
            reasons.push(format!(
                "{} invested in the last {} days",
                self.amount.current, TREND_WINDOW_DAYS
            ));
        }
        reasons
    }
}

/// Result of a designer's manual extension request. A non-trending
/// product yields `success == false` with the trend data, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionOutcome {
    pub success: bool,
    pub message: String,
    pub trend_data: TrendData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_deadline: Option<NaiveDateTime>,
}

/// Summary of one automatic extension run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionRunSummary {
    pub products_scanned: usize,
    pub products_extended: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_trending_on_views_alone() {
        // 60 views, nothing else: trending, reason cites the view count.
        let trend = TrendData::evaluate(60, 0, Decimal::ZERO, &TrendThresholds::auto());
        assert!(trend.is_trending());
        let reasons = trend.reasons();
        assert_eq!(reasons.len(), 1);
        assert!(reasons[0].contains("60 views"));
    }

    #[test]
    fn test_trending_on_amount_alone() {
        let trend = TrendData::evaluate(0, 0, dec!(1000), &TrendThresholds::auto());
        assert!(trend.is_trending());
        assert!(trend.amount.met);
        assert!(!trend.views.met);
    }

    #[test]
    fn test_not_trending_below_all_thresholds() {
        let trend = TrendData::evaluate(49, 2, dec!(999.99), &TrendThresholds::auto());
        assert!(!trend.is_trending());
        assert!(trend.reasons().is_empty());
    }

    #[test]
    fn test_manual_thresholds_are_lower() {
        let auto = TrendData::evaluate(30, 2, dec!(500), &TrendThresholds::auto());
        assert!(!auto.is_trending());
        let manual = TrendData::evaluate(30, 2, dec!(500), &TrendThresholds::manual());
        assert!(manual.is_trending());
        assert!(manual.views.met && manual.investments.met && manual.amount.met);
    }
}
