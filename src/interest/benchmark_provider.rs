//! Benchmark rate source.
//!
//! Fetches external reference rates (central-bank policy rate, short
//! treasury yield). Fetch failures are expected and handled upstream by
//! per-indicator backup constants, so the error type here never escapes
//! the rate sync job.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::interest_constants::INDICATOR_SOURCE_MARKET;
use super::interest_model::IndicatorSnapshot;
use crate::utils::parse_decimal_tolerant;

#[derive(Debug, Error)]
pub enum BenchmarkError {
    #[error("Benchmark request failed: {0}")]
    Http(String),

    #[error("Indicator '{0}' unavailable upstream")]
    Unavailable(String),

    #[error("Failed to parse benchmark response: {0}")]
    Parse(String),
}

#[async_trait]
pub trait BenchmarkRateProvider: Send + Sync {
    /// Fetches the latest value of one indicator.
    async fn fetch_indicator(
        &self,
        indicator: &str,
    ) -> std::result::Result<IndicatorSnapshot, BenchmarkError>;
}

#[derive(Debug, Deserialize)]
struct IndicatorResponse {
    value: String,
    date: NaiveDate,
}

/// HTTP implementation against the platform's benchmark data service.
pub struct HttpBenchmarkProvider {
    client: Client,
    base_url: String,
}

impl HttpBenchmarkProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl BenchmarkRateProvider for HttpBenchmarkProvider {
    async fn fetch_indicator(
        &self,
        indicator: &str,
    ) -> std::result::Result<IndicatorSnapshot, BenchmarkError> {
        let url = format!(
            "{}/indicators/{}/latest",
            self.base_url.trim_end_matches('/'),
            indicator
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BenchmarkError::Http(e.to_string()))?;

        if response.status().as_u16() == 404 {
            return Err(BenchmarkError::Unavailable(indicator.to_string()));
        }
        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(BenchmarkError::Http(format!(
                "Benchmark API error ({}): {}",
                status, error_body
            )));
        }

        let parsed: IndicatorResponse = response
            .json()
            .await
            .map_err(|e| BenchmarkError::Parse(e.to_string()))?;

        Ok(IndicatorSnapshot {
            indicator: indicator.to_string(),
            value: parse_decimal_tolerant(&parsed.value, "indicator.value"),
            as_of: parsed.date,
            source: INDICATOR_SOURCE_MARKET.to_string(),
        })
    }
}
