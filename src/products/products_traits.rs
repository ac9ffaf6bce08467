//! Product repository trait.

use chrono::NaiveDateTime;
use diesel::SqliteConnection;
use rust_decimal::Decimal;

use super::products_model::{ExtensionRecord, NewProduct, Product};
use crate::errors::Result;

pub trait ProductRepositoryTrait: Send + Sync {
    /// Creates a new product.
    fn create(&self, new_product: NewProduct) -> Result<Product>;

    /// Retrieves a product by its ID.
    fn get_by_id(&self, product_id: &str) -> Result<Product>;

    /// Freshness read inside an open transaction.
    fn get_by_id_in_tx(&self, conn: &mut SqliteConnection, product_id: &str) -> Result<Product>;

    /// Active products whose deadline has passed as of the given instant,
    /// read inside an open transaction (reconciliation scan).
    fn list_expired_active_in_tx(
        &self,
        conn: &mut SqliteConnection,
        as_of: NaiveDateTime,
    ) -> Result<Vec<Product>>;

    /// Active products whose deadline falls within `(now, horizon]`
    /// (auto-extension candidates).
    fn list_active_deadline_within(
        &self,
        now: NaiveDateTime,
        horizon: NaiveDateTime,
    ) -> Result<Vec<Product>>;

    /// Writes a new funding total and touches `updated_at`, inside an open
    /// transaction.
    fn set_funding_in_tx(
        &self,
        conn: &mut SqliteConnection,
        product_id: &str,
        new_funding: Decimal,
    ) -> Result<()>;

    /// Archives a product (status, `archived_at`, `archive_reason`), inside
    /// an open transaction.
    fn archive_in_tx(
        &self,
        conn: &mut SqliteConnection,
        product_id: &str,
        archived_at: NaiveDateTime,
        reason: &str,
    ) -> Result<()>;

    /// Moves the deadline and appends to the extension history, optionally
    /// consuming the one-time manual extension, inside an open transaction.
    fn extend_deadline_in_tx(
        &self,
        conn: &mut SqliteConnection,
        product_id: &str,
        record: ExtensionRecord,
        count_as_manual: bool,
    ) -> Result<()>;

    /// Records a storefront view of a product.
    fn record_view(&self, product_id: &str, viewer_id: Option<&str>) -> Result<()>;

    /// Number of recorded views of a product since the given instant.
    fn count_views_since(&self, product_id: &str, since: NaiveDateTime) -> Result<i64>;
}
