//! Settlement request/response models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::CURRENCY_DECIMAL_PRECISION;
use crate::{errors::ValidationError, Error, Result};

/// An investor's request to fund a product from their wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentRequest {
    pub user_id: String,
    pub product_id: String,
    pub amount: Decimal,
    pub product_name: String,
}

impl InvestmentRequest {
    /// Validates shape and range before any store access.
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "userId".to_string(),
            )));
        }
        if self.product_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "productId".to_string(),
            )));
        }
        if self.amount <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Investment amount must be positive, got {}",
                self.amount
            ))));
        }
        // Sub-cent amounts are rejected rather than silently rounded.
        if self.amount.round_dp(CURRENCY_DECIMAL_PRECISION) != self.amount {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Investment amount {} exceeds currency precision ({} decimal places)",
                self.amount, CURRENCY_DECIMAL_PRECISION
            ))));
        }
        Ok(())
    }
}

/// Returned to the caller after a successful settlement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentReceipt {
    pub investment_id: String,
    pub new_balance: Decimal,
    pub message: String,
}
