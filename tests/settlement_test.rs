use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal_macros::dec;

use makerfund_core::db::DbPool;
use makerfund_core::identity::{CallerIdentity, IdentityProviderTrait, Role, StaticIdentityProvider};
use makerfund_core::investments::{InvestmentRepository, InvestmentRepositoryTrait};
use makerfund_core::ledger::{EntryType, LedgerRepository, LedgerRepositoryTrait};
use makerfund_core::products::{ProductRepository, ProductRepositoryTrait, ProductStatus};
use makerfund_core::settlement::{InvestmentRequest, SettlementService, SettlementServiceTrait};
use makerfund_core::wallets::{WalletRepository, WalletRepositoryTrait};

mod common;

fn settlement_service(
    pool: &Arc<DbPool>,
) -> (SettlementService<Arc<DbPool>>, Arc<StaticIdentityProvider>) {
    let identity_provider = Arc::new(StaticIdentityProvider::new());
    let service = SettlementService::new(
        Arc::new(WalletRepository::new(pool.clone())),
        Arc::new(ProductRepository::new(pool.clone())),
        Arc::new(InvestmentRepository::new(pool.clone())),
        Arc::new(LedgerRepository::new(pool.clone())),
        identity_provider.clone() as Arc<dyn IdentityProviderTrait>,
        pool.clone(),
    );
    (service, identity_provider)
}

#[tokio::test]
async fn test_investment_settles_atomically() {
    let db = common::setup_db();
    let (service, identity_provider) = settlement_service(&db.pool);
    identity_provider.register("alice", [Role::Investor]);

    common::seed_wallet(&db.pool, "alice", dec!(1000));
    let deadline = Utc::now().naive_utc() + Duration::days(30);
    let product = common::seed_product(
        &db.pool,
        "dana",
        "Modular Desk Lamp",
        ProductStatus::Active,
        dec!(5000),
        deadline,
    );

    let caller = CallerIdentity::new("alice", [Role::Investor]);
    let receipt = service
        .invest(
            Some(&caller),
            InvestmentRequest {
                user_id: "alice".to_string(),
                product_id: product.id.clone(),
                amount: dec!(250),
                product_name: product.name.clone(),
            },
        )
        .await
        .unwrap();

    assert_eq!(receipt.new_balance, dec!(750));

    // Wallet, product funding, ledger, and investment all moved together.
    let wallet_repository = WalletRepository::new(db.pool.clone());
    assert_eq!(
        wallet_repository.get_by_user_id("alice").unwrap().balance,
        dec!(750)
    );

    let product_repository = ProductRepository::new(db.pool.clone());
    assert_eq!(
        product_repository
            .get_by_id(&product.id)
            .unwrap()
            .current_funding,
        dec!(250)
    );

    let ledger_repository = LedgerRepository::new(db.pool.clone());
    let entries = ledger_repository.list_for_user("alice").unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].entry_type, EntryType::Debit.as_str());
    assert_eq!(entries[0].amount, dec!(250));
    assert_eq!(entries[0].description, "Investment in Modular Desk Lamp");

    let investment_repository = InvestmentRepository::new(db.pool.clone());
    let investments = investment_repository.list_for_user("alice").unwrap();
    assert_eq!(investments.len(), 1);
    assert_eq!(investments[0].id, receipt.investment_id);
    assert_eq!(investments[0].amount, dec!(250));
}

#[tokio::test]
async fn test_insufficient_funds_leaves_no_partial_effect() {
    let db = common::setup_db();
    let (service, identity_provider) = settlement_service(&db.pool);
    identity_provider.register("bob", [Role::Investor]);

    common::seed_wallet(&db.pool, "bob", dec!(50));
    let deadline = Utc::now().naive_utc() + Duration::days(30);
    let product = common::seed_product(
        &db.pool,
        "dana",
        "Folding Bike Rack",
        ProductStatus::Active,
        dec!(2000),
        deadline,
    );

    let caller = CallerIdentity::new("bob", [Role::Investor]);
    let err = service
        .invest(
            Some(&caller),
            InvestmentRequest {
                user_id: "bob".to_string(),
                product_id: product.id.clone(),
                amount: dec!(100),
                product_name: product.name.clone(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "insufficient-funds");

    // The rejected transfer left nothing behind.
    let wallet_repository = WalletRepository::new(db.pool.clone());
    assert_eq!(
        wallet_repository.get_by_user_id("bob").unwrap().balance,
        dec!(50)
    );
    let product_repository = ProductRepository::new(db.pool.clone());
    assert_eq!(
        product_repository
            .get_by_id(&product.id)
            .unwrap()
            .current_funding,
        dec!(0)
    );
    let ledger_repository = LedgerRepository::new(db.pool.clone());
    assert!(ledger_repository.list_for_user("bob").unwrap().is_empty());
    let investment_repository = InvestmentRepository::new(db.pool.clone());
    assert!(investment_repository.list_for_user("bob").unwrap().is_empty());
}

#[tokio::test]
async fn test_second_overdraw_fails_after_first_settles() {
    let db = common::setup_db();
    let (service, identity_provider) = settlement_service(&db.pool);
    identity_provider.register("carol", [Role::Investor]);

    common::seed_wallet(&db.pool, "carol", dec!(1000));
    let deadline = Utc::now().naive_utc() + Duration::days(30);
    let product = common::seed_product(
        &db.pool,
        "dana",
        "Ceramic Pour-Over Set",
        ProductStatus::Active,
        dec!(10000),
        deadline,
    );

    let caller = CallerIdentity::new("carol", [Role::Investor]);
    let request = InvestmentRequest {
        user_id: "carol".to_string(),
        product_id: product.id.clone(),
        amount: dec!(600),
        product_name: product.name.clone(),
    };

    service.invest(Some(&caller), request.clone()).await.unwrap();
    let err = service.invest(Some(&caller), request).await.unwrap_err();
    assert_eq!(err.code(), "insufficient-funds");

    let wallet_repository = WalletRepository::new(db.pool.clone());
    assert_eq!(
        wallet_repository.get_by_user_id("carol").unwrap().balance,
        dec!(400)
    );
    let product_repository = ProductRepository::new(db.pool.clone());
    assert_eq!(
        product_repository
            .get_by_id(&product.id)
            .unwrap()
            .current_funding,
        dec!(600)
    );
}

#[tokio::test]
async fn test_caller_may_only_invest_for_themselves() {
    let db = common::setup_db();
    let (service, identity_provider) = settlement_service(&db.pool);
    identity_provider.register("alice", [Role::Investor]);

    common::seed_wallet(&db.pool, "alice", dec!(1000));
    let deadline = Utc::now().naive_utc() + Duration::days(30);
    let product = common::seed_product(
        &db.pool,
        "dana",
        "Desk Lamp",
        ProductStatus::Active,
        dec!(5000),
        deadline,
    );

    let caller = CallerIdentity::new("mallory", [Role::Investor]);
    let err = service
        .invest(
            Some(&caller),
            InvestmentRequest {
                user_id: "alice".to_string(),
                product_id: product.id.clone(),
                amount: dec!(100),
                product_name: product.name.clone(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "authorization-error");

    let err = service
        .invest(
            None,
            InvestmentRequest {
                user_id: "alice".to_string(),
                product_id: product.id,
                amount: dec!(100),
                product_name: "Desk Lamp".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "authentication-error");
}

#[tokio::test]
async fn test_investor_role_is_required() {
    let db = common::setup_db();
    let (service, identity_provider) = settlement_service(&db.pool);
    identity_provider.register("dana", [Role::Designer]);

    common::seed_wallet(&db.pool, "dana", dec!(1000));
    let deadline = Utc::now().naive_utc() + Duration::days(30);
    let product = common::seed_product(
        &db.pool,
        "erin",
        "Desk Lamp",
        ProductStatus::Active,
        dec!(5000),
        deadline,
    );

    let caller = CallerIdentity::new("dana", [Role::Designer]);
    let err = service
        .invest(
            Some(&caller),
            InvestmentRequest {
                user_id: "dana".to_string(),
                product_id: product.id,
                amount: dec!(100),
                product_name: "Desk Lamp".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "authorization-error");
}

#[tokio::test]
async fn test_archived_product_rejects_investment() {
    let db = common::setup_db();
    let (service, identity_provider) = settlement_service(&db.pool);
    identity_provider.register("alice", [Role::Investor]);

    common::seed_wallet(&db.pool, "alice", dec!(1000));
    let deadline = Utc::now().naive_utc() + Duration::days(30);
    let product = common::seed_product(
        &db.pool,
        "dana",
        "Cancelled Gadget",
        ProductStatus::Archived,
        dec!(5000),
        deadline,
    );

    let caller = CallerIdentity::new("alice", [Role::Investor]);
    let err = service
        .invest(
            Some(&caller),
            InvestmentRequest {
                user_id: "alice".to_string(),
                product_id: product.id,
                amount: dec!(100),
                product_name: "Cancelled Gadget".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "precondition-error");

    let wallet_repository = WalletRepository::new(db.pool.clone());
    assert_eq!(
        wallet_repository.get_by_user_id("alice").unwrap().balance,
        dec!(1000)
    );
}

#[tokio::test]
async fn test_unknown_investor_is_not_found() {
    let db = common::setup_db();
    let (service, _identity_provider) = settlement_service(&db.pool);

    common::seed_wallet(&db.pool, "ghost", dec!(1000));
    let deadline = Utc::now().naive_utc() + Duration::days(30);
    let product = common::seed_product(
        &db.pool,
        "dana",
        "Desk Lamp",
        ProductStatus::Active,
        dec!(5000),
        deadline,
    );

    let caller = CallerIdentity::new("ghost", [Role::Investor]);
    let err = service
        .invest(
            Some(&caller),
            InvestmentRequest {
                user_id: "ghost".to_string(),
                product_id: product.id,
                amount: dec!(100),
                product_name: "Desk Lamp".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "not-found");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_investments_cannot_overdraw() {
    let db = common::setup_db();
    let (service, identity_provider) = settlement_service(&db.pool);
    identity_provider.register("erin", [Role::Investor]);

    common::seed_wallet(&db.pool, "erin", dec!(1000));
    let deadline = Utc::now().naive_utc() + Duration::days(30);
    let product = common::seed_product(
        &db.pool,
        "dana",
        "Folding Workbench",
        ProductStatus::Active,
        dec!(10000),
        deadline,
    );

    // Two 600 settlements race against a 1000 balance; exactly one may
    // commit and the other must see the committed balance, not a busy
    // database.
    let service = Arc::new(service);
    let mut handles = Vec::new();
    for _ in 0..2 {
        let service = service.clone();
        let product_id = product.id.clone();
        let product_name = product.name.clone();
        handles.push(tokio::spawn(async move {
            let caller = CallerIdentity::new("erin", [Role::Investor]);
            service
                .invest(
                    Some(&caller),
                    InvestmentRequest {
                        user_id: "erin".to_string(),
                        product_id,
                        amount: dec!(600),
                        product_name,
                    },
                )
                .await
        }));
    }

    let mut outcomes = Vec::new();
    for handle in handles {
        outcomes.push(handle.await.unwrap());
    }

    let settled = outcomes.iter().filter(|r| r.is_ok()).count();
    assert_eq!(settled, 1);
    let err = outcomes.into_iter().find_map(|r| r.err()).unwrap();
    assert_eq!(err.code(), "insufficient-funds");

    let wallet_repository = WalletRepository::new(db.pool.clone());
    assert_eq!(
        wallet_repository.get_by_user_id("erin").unwrap().balance,
        dec!(400)
    );
    let product_repository = ProductRepository::new(db.pool.clone());
    assert_eq!(
        product_repository
            .get_by_id(&product.id)
            .unwrap()
            .current_funding,
        dec!(600)
    );
    let investment_repository = InvestmentRepository::new(db.pool.clone());
    assert_eq!(
        investment_repository.list_for_user("erin").unwrap().len(),
        1
    );
    let ledger_repository = LedgerRepository::new(db.pool.clone());
    assert_eq!(ledger_repository.list_for_user("erin").unwrap().len(), 1);
}
