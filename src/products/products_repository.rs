use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::db::{get_connection, DbPool};
use crate::errors::{Error, Result};
use crate::schema::product_views;
use crate::schema::products;

use super::products_model::{
    parse_extension_history, ExtensionRecord, NewProduct, Product, ProductDB, ProductStatus,
};
use super::products_traits::ProductRepositoryTrait;

/// Repository for managing product data and the product view log
pub struct ProductRepository {
    pool: Arc<DbPool>,
}

impl ProductRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    fn find_by_id(conn: &mut SqliteConnection, product_id: &str) -> Result<ProductDB> {
        products::table
            .find(product_id)
            .first::<ProductDB>(conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    Error::NotFound(format!("Product with id {} not found", product_id))
                }
                _ => e.into(),
            })
    }
}

impl ProductRepositoryTrait for ProductRepository {
    fn create(&self, new_product: NewProduct) -> Result<Product> {
        new_product.validate()?;

        let now = Utc::now().naive_utc();
        let product_db = ProductDB {
            id: new_product
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            designer_id: new_product.designer_id,
            name: new_product.name,
            status: new_product.status.as_str().to_string(),
            funding_goal: new_product.funding_goal.to_string(),
            current_funding: Decimal::ZERO.to_string(),
            deadline: new_product.deadline,
            manual_extension_count: 0,
            extension_history: "[]".to_string(),
            archived_at: None,
            archive_reason: None,
            created_at: now,
            updated_at: now,
        };

        let mut conn = get_connection(&self.pool)?;
        diesel::insert_into(products::table)
            .values(&product_db)
            .execute(&mut conn)?;

        Ok(product_db.into())
    }

    fn get_by_id(&self, product_id: &str) -> Result<Product> {
        let mut conn = get_connection(&self.pool)?;
        Self::find_by_id(&mut conn, product_id).map(Product::from)
    }

    fn get_by_id_in_tx(&self, conn: &mut SqliteConnection, product_id: &str) -> Result<Product> {
        Self::find_by_id(conn, product_id).map(Product::from)
    }

    fn list_expired_active_in_tx(
        &self,
        conn: &mut SqliteConnection,
        as_of: NaiveDateTime,
    ) -> Result<Vec<Product>> {
        products::table
            .filter(products::status.eq(ProductStatus::Active.as_str()))
            .filter(products::deadline.le(as_of))
            .order(products::deadline.asc())
            .load::<ProductDB>(conn)
            .map(|results| results.into_iter().map(Product::from).collect())
            .map_err(Error::from)
    }

    fn list_active_deadline_within(
        &self,
        now: NaiveDateTime,
        horizon: NaiveDateTime,
    ) -> Result<Vec<Product>> {
        let mut conn = get_connection(&self.pool)?;
        products::table
            .filter(products::status.eq(ProductStatus::Active.as_str()))
            .filter(products::deadline.gt(now))
            .filter(products::deadline.le(horizon))
            .order(products::deadline.asc())
            .load::<ProductDB>(&mut conn)
            .map(|results| results.into_iter().map(Product::from).collect())
            .map_err(Error::from)
    }

    fn set_funding_in_tx(
        &self,
        conn: &mut SqliteConnection,
        product_id: &str,
        new_funding: Decimal,
    ) -> Result<()> {
        let affected = diesel::update(products::table.find(product_id))
            .set((
                products::current_funding.eq(new_funding.to_string()),
                products::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)?;

        if affected == 0 {
            return Err(Error::NotFound(format!(
                "Product with id {} not found",
                product_id
            )));
        }

        Ok(())
    }

    fn archive_in_tx(
        &self,
        conn: &mut SqliteConnection,
        product_id: &str,
        archived_at: NaiveDateTime,
        reason: &str,
    ) -> Result<()> {
        let affected = diesel::update(
            products::table
                .find(product_id)
                .filter(products::status.ne(ProductStatus::Archived.as_str())),
        )
        .set((
            products::status.eq(ProductStatus::Archived.as_str()),
            products::archived_at.eq(Some(archived_at)),
            products::archive_reason.eq(Some(reason.to_string())),
            products::updated_at.eq(Utc::now().naive_utc()),
        ))
        .execute(conn)?;

        if affected == 0 {
            return Err(Error::Precondition(format!(
                "Product {} is already archived or missing",
                product_id
            )));
        }

        Ok(())
    }

    fn extend_deadline_in_tx(
        &self,
        conn: &mut SqliteConnection,
        product_id: &str,
        record: ExtensionRecord,
        count_as_manual: bool,
    ) -> Result<()> {
        let existing = Self::find_by_id(conn, product_id)?;
        if existing.status != ProductStatus::Active.as_str() {
            return Err(Error::Precondition(format!(
                "Product {} is not active (status: {})",
                product_id, existing.status
            )));
        }

        let mut history = parse_extension_history(&existing.extension_history, product_id);
        let new_deadline = record.new_deadline;
        history.push(record);
        let history_json = serde_json::to_string(&history)?;

        let new_manual_count = if count_as_manual {
            existing.manual_extension_count + 1
        } else {
            existing.manual_extension_count
        };

        diesel::update(products::table.find(product_id))
            .set((
                products::deadline.eq(new_deadline),
                products::extension_history.eq(history_json),
                products::manual_extension_count.eq(new_manual_count),
                products::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)?;

        Ok(())
    }

    fn record_view(&self, product_id: &str, viewer_id: Option<&str>) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        diesel::insert_into(product_views::table)
            .values((
                product_views::id.eq(uuid::Uuid::new_v4().to_string()),
                product_views::product_id.eq(product_id),
                product_views::viewer_id.eq(viewer_id),
                product_views::viewed_at.eq(Utc::now().naive_utc()),
            ))
            .execute(&mut conn)?;
        Ok(())
    }

    fn count_views_since(&self, product_id: &str, since: NaiveDateTime) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        product_views::table
            .filter(product_views::product_id.eq(product_id))
            .filter(product_views::viewed_at.ge(since))
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(Error::from)
    }
}
