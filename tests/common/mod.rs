use std::sync::Arc;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use tempfile::TempDir;

use makerfund_core::db::{self, DbPool, DbTransactionExecutor};
use makerfund_core::products::{
    NewProduct, Product, ProductRepository, ProductRepositoryTrait, ProductStatus,
};
use makerfund_core::wallets::{NewWallet, Wallet, WalletRepository, WalletRepositoryTrait};

/// A throwaway SQLite database, deleted when the value is dropped.
pub struct TestDb {
    pub pool: Arc<DbPool>,
    _dir: TempDir,
}

pub fn setup_db() -> TestDb {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = db::init(dir.path().to_str().unwrap()).expect("Failed to initialize database");
    let pool = db::create_pool(&db_path).expect("Failed to create database pool");
    db::run_migrations(&pool).expect("Failed to run migrations");

    TestDb { pool, _dir: dir }
}

#[allow(dead_code)]
pub fn seed_wallet(pool: &Arc<DbPool>, user_id: &str, balance: Decimal) -> Wallet {
    let repository = WalletRepository::new(pool.clone());
    repository
        .create(NewWallet {
            id: None,
            user_id: user_id.to_string(),
            balance,
        })
        .expect("Failed to seed wallet")
}

#[allow(dead_code)]
pub fn seed_product(
    pool: &Arc<DbPool>,
    designer_id: &str,
    name: &str,
    status: ProductStatus,
    funding_goal: Decimal,
    deadline: NaiveDateTime,
) -> Product {
    let repository = ProductRepository::new(pool.clone());
    repository
        .create(NewProduct {
            id: None,
            designer_id: designer_id.to_string(),
            name: name.to_string(),
            status,
            funding_goal,
            deadline,
        })
        .expect("Failed to seed product")
}

#[allow(dead_code)]
pub fn set_product_funding(pool: &Arc<DbPool>, product_id: &str, amount: Decimal) {
    let repository = ProductRepository::new(pool.clone());
    pool.execute(|conn| repository.set_funding_in_tx(conn, product_id, amount))
        .expect("Failed to set product funding");
}
