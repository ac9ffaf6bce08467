//! Product lifecycle domain models.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::parse_decimal_tolerant;
use crate::{errors::ValidationError, Error, Result};

/// Reason recorded when a product is archived for missing its funding goal.
pub const ARCHIVE_REASON_GOAL_NOT_MET: &str = "funding_goal_not_met";

/// Lifecycle state of a product.
///
/// Once `Archived`, funding and deadline are frozen; the reconciliation
/// job is the only writer of that transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Funding,
    Active,
    Open,
    Archived,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Funding => "funding",
            ProductStatus::Active => "active",
            ProductStatus::Open => "open",
            ProductStatus::Archived => "archived",
        }
    }

    /// Whether the product currently accepts investments.
    pub fn accepts_investment(&self) -> bool {
        matches!(
            self,
            ProductStatus::Funding | ProductStatus::Active | ProductStatus::Open
        )
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProductStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "funding" => Ok(ProductStatus::Funding),
            "active" => Ok(ProductStatus::Active),
            "open" => Ok(ProductStatus::Open),
            "archived" => Ok(ProductStatus::Archived),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown product status '{}'",
                other
            )))),
        }
    }
}

/// One deadline extension, appended to the product's extension history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionRecord {
    pub previous_deadline: NaiveDateTime,
    pub new_deadline: NaiveDateTime,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_by: Option<String>,
    pub timestamp: NaiveDateTime,
}

/// Domain model representing a crowdfunded product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub designer_id: String,
    pub name: String,
    pub status: ProductStatus,
    pub funding_goal: Decimal,
    pub current_funding: Decimal,
    pub deadline: NaiveDateTime,
    pub manual_extension_count: i32,
    pub extension_history: Vec<ExtensionRecord>,
    pub archived_at: Option<NaiveDateTime>,
    pub archive_reason: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Product {
    pub fn goal_reached(&self) -> bool {
        self.current_funding >= self.funding_goal
    }
}

/// Input model for creating a product (designer upload glue, test seeding).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub designer_id: String,
    pub name: String,
    pub status: ProductStatus,
    pub funding_goal: Decimal,
    pub deadline: NaiveDateTime,
}

impl NewProduct {
    /// Validates the new product data
    pub fn validate(&self) -> Result<()> {
        if self.designer_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Product designer id cannot be empty".to_string(),
            )));
        }
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Product name cannot be empty".to_string(),
            )));
        }
        if self.funding_goal.is_sign_negative() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Funding goal cannot be negative".to_string(),
            )));
        }
        Ok(())
    }
}

/// Database model for products
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::products)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProductDB {
    pub id: String,
    pub designer_id: String,
    pub name: String,
    pub status: String,
    pub funding_goal: String,
    pub current_funding: String,
    pub deadline: NaiveDateTime,
    pub manual_extension_count: i32,
    pub extension_history: String,
    pub archived_at: Option<NaiveDateTime>,
    pub archive_reason: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Parses the stored extension history JSON array, tolerating legacy or
/// corrupt values by returning an empty history.
pub(crate) fn parse_extension_history(raw: &str, product_id: &str) -> Vec<ExtensionRecord> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<ExtensionRecord>>(raw) {
        Ok(history) => history,
        Err(e) => {
            warn!(
                "Ignoring unparseable extension history for product {}: {}",
                product_id, e
            );
            Vec::new()
        }
    }
}

impl From<ProductDB> for Product {
    fn from(db: ProductDB) -> Self {
        let status = ProductStatus::from_str(&db.status).unwrap_or_else(|_| {
            warn!(
                "Product {} has unknown status '{}', treating as archived",
                db.id, db.status
            );
            ProductStatus::Archived
        });
        let extension_history = parse_extension_history(&db.extension_history, &db.id);
        Self {
            id: db.id,
            designer_id: db.designer_id,
            name: db.name,
            status,
            funding_goal: parse_decimal_tolerant(&db.funding_goal, "product.funding_goal"),
            current_funding: parse_decimal_tolerant(
                &db.current_funding,
                "product.current_funding",
            ),
            deadline: db.deadline,
            manual_extension_count: db.manual_extension_count,
            extension_history,
            archived_at: db.archived_at,
            archive_reason: db.archive_reason,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
