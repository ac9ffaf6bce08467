//! Investment repository trait.

use chrono::NaiveDateTime;
use diesel::SqliteConnection;
use rust_decimal::Decimal;

use super::investments_model::{Investment, NewInvestment};
use crate::errors::Result;

pub trait InvestmentRepositoryTrait: Send + Sync {
    /// Creates an investment record inside an open settlement transaction.
    fn create_in_tx(
        &self,
        conn: &mut SqliteConnection,
        new_investment: NewInvestment,
    ) -> Result<Investment>;

    /// Retrieves an investment by its ID.
    fn get_by_id(&self, investment_id: &str) -> Result<Investment>;

    /// Lists a user's investments, most recent first.
    fn list_for_user(&self, user_id: &str) -> Result<Vec<Investment>>;

    /// Number of active investments in a product since the given instant
    /// (trend metric).
    fn count_for_product_since(&self, product_id: &str, since: NaiveDateTime) -> Result<i64>;

    /// Total amount invested in a product since the given instant
    /// (trend metric).
    fn sum_for_product_since(&self, product_id: &str, since: NaiveDateTime) -> Result<Decimal>;
}
