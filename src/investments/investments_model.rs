//! Investment record models.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::parse_decimal_tolerant;

/// Status an investment record is created with. Later workflow states
/// (refunds, payouts) are written by other subsystems.
pub const INVESTMENT_STATUS_ACTIVE: &str = "active";

/// An investor's stake in a product. Immutable once written, except for
/// `status` updates by later workflows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    pub amount: Decimal,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating an investment inside a settlement transaction.
#[derive(Debug, Clone)]
pub struct NewInvestment {
    pub user_id: String,
    pub product_id: String,
    pub amount: Decimal,
}

/// Database model for investments
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::investments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct InvestmentDB {
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    pub amount: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<InvestmentDB> for Investment {
    fn from(db: InvestmentDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            product_id: db.product_id,
            amount: parse_decimal_tolerant(&db.amount, "investment.amount"),
            status: db.status,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
