use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::db::{get_connection, DbPool};
use crate::errors::{Error, Result};
use crate::schema::investments;
use crate::utils::parse_decimal_tolerant;

use super::investments_model::{
    Investment, InvestmentDB, NewInvestment, INVESTMENT_STATUS_ACTIVE,
};
use super::investments_traits::InvestmentRepositoryTrait;

/// Repository for investment records
pub struct InvestmentRepository {
    pool: Arc<DbPool>,
}

impl InvestmentRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

impl InvestmentRepositoryTrait for InvestmentRepository {
    fn create_in_tx(
        &self,
        conn: &mut SqliteConnection,
        new_investment: NewInvestment,
    ) -> Result<Investment> {
        let now = Utc::now().naive_utc();
        let investment_db = InvestmentDB {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: new_investment.user_id,
            product_id: new_investment.product_id,
            amount: new_investment.amount.to_string(),
            status: INVESTMENT_STATUS_ACTIVE.to_string(),
            created_at: now,
            updated_at: now,
        };

        diesel::insert_into(investments::table)
            .values(&investment_db)
            .execute(conn)?;

        Ok(investment_db.into())
    }

    fn get_by_id(&self, investment_id: &str) -> Result<Investment> {
        let mut conn = get_connection(&self.pool)?;
        investments::table
            .find(investment_id)
            .first::<InvestmentDB>(&mut conn)
            .map(Investment::from)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => Error::NotFound(format!(
                    "Investment with id {} not found",
                    investment_id
                )),
                _ => e.into(),
            })
    }

    fn list_for_user(&self, user_id: &str) -> Result<Vec<Investment>> {
        let mut conn = get_connection(&self.pool)?;
        investments::table
            .filter(investments::user_id.eq(user_id))
            .order(investments::created_at.desc())
            .load::<InvestmentDB>(&mut conn)
            .map(|results| results.into_iter().map(Investment::from).collect())
            .map_err(Error::from)
    }

    fn count_for_product_since(&self, product_id: &str, since: NaiveDateTime) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        investments::table
            .filter(investments::product_id.eq(product_id))
            .filter(investments::status.eq(INVESTMENT_STATUS_ACTIVE))
            .filter(investments::created_at.ge(since))
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(Error::from)
    }

    fn sum_for_product_since(&self, product_id: &str, since: NaiveDateTime) -> Result<Decimal> {
        // Amounts are TEXT-decimal columns, so the sum happens in Decimal
        // space rather than in SQL.
        let mut conn = get_connection(&self.pool)?;
        let amounts: Vec<String> = investments::table
            .filter(investments::product_id.eq(product_id))
            .filter(investments::status.eq(INVESTMENT_STATUS_ACTIVE))
            .filter(investments::created_at.ge(since))
            .select(investments::amount)
            .load::<String>(&mut conn)?;

        Ok(amounts
            .iter()
            .map(|a| parse_decimal_tolerant(a, "investment.amount"))
            .sum())
    }
}
