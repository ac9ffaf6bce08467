use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal_macros::dec;

use makerfund_core::db::{DbPool, DbTransactionExecutor};
use makerfund_core::extensions::{ExtensionService, ExtensionServiceTrait};
use makerfund_core::identity::{CallerIdentity, Role};
use makerfund_core::interest::{
    AccrualService, AccrualServiceTrait, InterestRepository, InterestRepositoryTrait,
};
use makerfund_core::investments::InvestmentRepository;
use makerfund_core::notifications::{
    NotificationRepository, NotificationRepositoryTrait, NOTIFICATION_KIND_DEADLINE_EXTENDED,
    NOTIFICATION_KIND_PRODUCT_ARCHIVED,
};
use makerfund_core::products::{
    ExtensionRecord, ProductRepository, ProductRepositoryTrait, ProductStatus,
    ARCHIVE_REASON_GOAL_NOT_MET,
};
use makerfund_core::reconciliation::{ReconciliationService, ReconciliationServiceTrait};
use makerfund_core::system_logs::{
    SystemLogRepository, SystemLogRepositoryTrait, LOG_TYPE_DEADLINE_RECONCILIATION,
    LOG_TYPE_INTEREST_ACCRUAL, LOG_TYPE_TREND_EXTENSION,
};
use makerfund_core::wallets::{WalletRepository, WalletRepositoryTrait};

mod common;

fn accrual_service(pool: &Arc<DbPool>) -> AccrualService<Arc<DbPool>> {
    AccrualService::new(
        Arc::new(WalletRepository::new(pool.clone())),
        Arc::new(InterestRepository::new(pool.clone())),
        Arc::new(SystemLogRepository::new(pool.clone())),
        pool.clone(),
    )
}

fn reconciliation_service(pool: &Arc<DbPool>) -> ReconciliationService<Arc<DbPool>> {
    ReconciliationService::new(
        Arc::new(ProductRepository::new(pool.clone())),
        Arc::new(NotificationRepository::new(pool.clone())),
        Arc::new(SystemLogRepository::new(pool.clone())),
        pool.clone(),
    )
}

fn extension_service(pool: &Arc<DbPool>) -> ExtensionService<Arc<DbPool>> {
    ExtensionService::new(
        Arc::new(ProductRepository::new(pool.clone())),
        Arc::new(InvestmentRepository::new(pool.clone())),
        Arc::new(NotificationRepository::new(pool.clone())),
        Arc::new(SystemLogRepository::new(pool.clone())),
        pool.clone(),
    )
}

#[tokio::test]
async fn test_accrual_credits_eligible_wallets() {
    let db = common::setup_db();
    common::seed_wallet(&db.pool, "alice", dec!(1000));
    common::seed_wallet(&db.pool, "bob", dec!(2500));
    let empty = common::seed_wallet(&db.pool, "carol", dec!(0));

    // Seeded settings carry the 0.00014 default daily rate.
    let summary = accrual_service(&db.pool).run_accrual().await.unwrap();
    assert_eq!(summary.wallets_scanned, 3);
    assert_eq!(summary.wallets_credited, 2);
    assert_eq!(summary.daily_rate, dec!(0.00014));
    assert_eq!(summary.total_interest, dec!(0.49));

    let wallet_repository = WalletRepository::new(db.pool.clone());
    let alice = wallet_repository.get_by_user_id("alice").unwrap();
    assert_eq!(alice.balance, dec!(1000.14));
    assert_eq!(
        wallet_repository.get_by_user_id("bob").unwrap().balance,
        dec!(2500.35)
    );
    assert_eq!(
        wallet_repository.get_by_user_id("carol").unwrap().balance,
        dec!(0)
    );

    let interest_repository = InterestRepository::new(db.pool.clone());
    let history = interest_repository.list_history_for_wallet(&alice.id).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].amount, dec!(0.14));
    assert_eq!(history[0].rate, dec!(0.00014));
    assert_eq!(history[0].previous_balance, dec!(1000));
    assert_eq!(history[0].new_balance, dec!(1000.14));

    assert!(interest_repository
        .list_history_for_wallet(&empty.id)
        .unwrap()
        .is_empty());

    let logs = SystemLogRepository::new(db.pool.clone())
        .list_recent(10)
        .unwrap();
    assert!(logs.iter().any(|l| l.log_type == LOG_TYPE_INTEREST_ACCRUAL));
}

#[tokio::test]
async fn test_accrual_skips_wallets_below_minimum_balance() {
    let db = common::setup_db();
    common::seed_wallet(&db.pool, "small", dec!(400));
    common::seed_wallet(&db.pool, "large", dec!(600));

    let interest_repository = InterestRepository::new(db.pool.clone());
    let mut settings = interest_repository.get_settings().unwrap();
    settings.min_balance = dec!(500);
    interest_repository.save_settings(&settings).unwrap();

    let summary = accrual_service(&db.pool).run_accrual().await.unwrap();
    assert_eq!(summary.wallets_scanned, 2);
    assert_eq!(summary.wallets_credited, 1);

    let wallet_repository = WalletRepository::new(db.pool.clone());
    assert_eq!(
        wallet_repository.get_by_user_id("small").unwrap().balance,
        dec!(400)
    );
    assert_eq!(
        wallet_repository.get_by_user_id("large").unwrap().balance,
        dec!(600.08)
    );
}

#[tokio::test]
async fn test_reconciliation_archives_underfunded_expired_products() {
    let db = common::setup_db();
    let as_of = Utc::now().naive_utc();

    let missed = common::seed_product(
        &db.pool,
        "dana",
        "Walnut Keyboard Tray",
        ProductStatus::Active,
        dec!(1000),
        as_of - Duration::days(1),
    );
    common::set_product_funding(&db.pool, &missed.id, dec!(100));

    let funded = common::seed_product(
        &db.pool,
        "erin",
        "Magnetic Spice Rack",
        ProductStatus::Active,
        dec!(2000),
        as_of - Duration::days(1),
    );
    common::set_product_funding(&db.pool, &funded.id, dec!(3000));

    let ongoing = common::seed_product(
        &db.pool,
        "dana",
        "Cork Planter",
        ProductStatus::Active,
        dec!(500),
        as_of + Duration::days(10),
    );

    let service = reconciliation_service(&db.pool);
    let summary = service.run_reconciliation(Some(as_of)).await.unwrap();
    assert_eq!(summary.products_checked, 2);
    assert_eq!(summary.products_archived, 1);
    assert_eq!(summary.notifications_sent, 1);

    let product_repository = ProductRepository::new(db.pool.clone());
    let archived = product_repository.get_by_id(&missed.id).unwrap();
    assert_eq!(archived.status, ProductStatus::Archived);
    assert_eq!(
        archived.archive_reason.as_deref(),
        Some(ARCHIVE_REASON_GOAL_NOT_MET)
    );
    assert_eq!(archived.archived_at, Some(as_of));

    // Goal-met and not-yet-due products are untouched.
    assert_eq!(
        product_repository.get_by_id(&funded.id).unwrap().status,
        ProductStatus::Active
    );
    assert_eq!(
        product_repository.get_by_id(&ongoing.id).unwrap().status,
        ProductStatus::Active
    );

    let notifications = NotificationRepository::new(db.pool.clone())
        .list_for_user("dana", false)
        .unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NOTIFICATION_KIND_PRODUCT_ARCHIVED);
    assert_eq!(notifications[0].product_id.as_deref(), Some(missed.id.as_str()));

    let logs = SystemLogRepository::new(db.pool.clone())
        .list_recent(10)
        .unwrap();
    assert!(logs
        .iter()
        .any(|l| l.log_type == LOG_TYPE_DEADLINE_RECONCILIATION));

    // A second run finds nothing left to archive.
    let summary = service.run_reconciliation(Some(as_of)).await.unwrap();
    assert_eq!(summary.products_archived, 0);
    assert_eq!(
        NotificationRepository::new(db.pool.clone())
            .list_for_user("dana", false)
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn test_manual_reconciliation_requires_admin() {
    let db = common::setup_db();
    let service = reconciliation_service(&db.pool);

    let caller = CallerIdentity::new("dana", [Role::Designer]);
    let err = service.run_manual(Some(&caller), None).await.unwrap_err();
    assert_eq!(err.code(), "authorization-error");

    let err = service.run_manual(None, None).await.unwrap_err();
    assert_eq!(err.code(), "authentication-error");

    let admin = CallerIdentity::new("root", [Role::Admin]);
    let summary = service.run_manual(Some(&admin), None).await.unwrap();
    assert_eq!(summary.products_checked, 0);
}

#[tokio::test]
async fn test_trending_product_gets_automatic_extension() {
    let db = common::setup_db();
    let now = Utc::now().naive_utc();

    let trending = common::seed_product(
        &db.pool,
        "dana",
        "Brass Door Handle",
        ProductStatus::Active,
        dec!(1000),
        now + Duration::days(3),
    );
    let quiet = common::seed_product(
        &db.pool,
        "erin",
        "Felt Coaster Set",
        ProductStatus::Active,
        dec!(1000),
        now + Duration::days(3),
    );

    let product_repository = ProductRepository::new(db.pool.clone());
    for _ in 0..60 {
        product_repository.record_view(&trending.id, None).unwrap();
    }
    for _ in 0..10 {
        product_repository.record_view(&quiet.id, None).unwrap();
    }

    let summary = extension_service(&db.pool)
        .run_auto_extension(Some(now))
        .await
        .unwrap();
    assert_eq!(summary.products_scanned, 2);
    assert_eq!(summary.products_extended, 1);

    let extended = product_repository.get_by_id(&trending.id).unwrap();
    assert_eq!(extended.deadline, trending.deadline + Duration::days(7));
    assert_eq!(extended.manual_extension_count, 0);
    assert_eq!(extended.extension_history.len(), 1);
    assert_eq!(extended.extension_history[0].previous_deadline, trending.deadline);
    assert!(extended.extension_history[0].reason.contains("60 views"));
    assert!(extended.extension_history[0].requested_by.is_none());

    assert_eq!(
        product_repository.get_by_id(&quiet.id).unwrap().deadline,
        quiet.deadline
    );

    let notifications = NotificationRepository::new(db.pool.clone())
        .list_for_user("dana", false)
        .unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NOTIFICATION_KIND_DEADLINE_EXTENDED);

    let logs = SystemLogRepository::new(db.pool.clone())
        .list_recent(10)
        .unwrap();
    assert!(logs.iter().any(|l| l.log_type == LOG_TYPE_TREND_EXTENSION));
}

#[tokio::test]
async fn test_manual_extension_request_lifecycle() {
    let db = common::setup_db();
    let now = Utc::now().naive_utc();
    let service = extension_service(&db.pool);

    let product = common::seed_product(
        &db.pool,
        "dana",
        "Oak Monitor Stand",
        ProductStatus::Active,
        dec!(1000),
        now + Duration::days(3),
    );

    // Only the product's designer may ask.
    let stranger = CallerIdentity::new("erin", [Role::Designer]);
    let err = service
        .request_extension(Some(&stranger), &product.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "authorization-error");

    // Below the manual thresholds the request is declined, not an error.
    let designer = CallerIdentity::new("dana", [Role::Designer]);
    let outcome = service
        .request_extension(Some(&designer), &product.id)
        .await
        .unwrap();
    assert!(!outcome.success);
    assert!(outcome.new_deadline.is_none());
    assert!(!outcome.trend_data.views.met);

    // 35 recent views clears the 30-view manual threshold.
    let product_repository = ProductRepository::new(db.pool.clone());
    for _ in 0..35 {
        product_repository.record_view(&product.id, None).unwrap();
    }

    let outcome = service
        .request_extension(Some(&designer), &product.id)
        .await
        .unwrap();
    assert!(outcome.success);
    assert_eq!(
        outcome.new_deadline,
        Some(product.deadline + Duration::days(7))
    );
    assert!(outcome.trend_data.views.met);

    let updated = product_repository.get_by_id(&product.id).unwrap();
    assert_eq!(updated.manual_extension_count, 1);
    assert_eq!(updated.extension_history.len(), 1);
    assert_eq!(
        updated.extension_history[0].requested_by.as_deref(),
        Some("dana")
    );

    // The manual extension is a one-time allowance.
    let err = service
        .request_extension(Some(&designer), &product.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "precondition-error");
}

#[tokio::test]
async fn test_accrual_applies_latest_saved_rate() {
    let db = common::setup_db();
    common::seed_wallet(&db.pool, "alice", dec!(1000));

    let interest_repository = InterestRepository::new(db.pool.clone());
    let mut settings = interest_repository.get_settings().unwrap();
    settings.daily_rate = dec!(0.001);
    interest_repository.save_settings(&settings).unwrap();

    // The run reads its rate inside the accrual transaction, so the
    // freshly saved rate is the one applied.
    let summary = accrual_service(&db.pool).run_accrual().await.unwrap();
    assert_eq!(summary.daily_rate, dec!(0.001));
    assert_eq!(summary.wallets_credited, 1);

    let wallet_repository = WalletRepository::new(db.pool.clone());
    let alice = wallet_repository.get_by_user_id("alice").unwrap();
    assert_eq!(alice.balance, dec!(1001.00));

    let history = interest_repository
        .list_history_for_wallet(&alice.id)
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].amount, dec!(1.00));
    assert_eq!(history[0].rate, dec!(0.001));
}

#[test]
fn test_archived_product_deadline_stays_frozen() {
    let db = common::setup_db();
    let deadline = Utc::now().naive_utc() + Duration::days(3);
    let product = common::seed_product(
        &db.pool,
        "dana",
        "Walnut Phone Stand",
        ProductStatus::Active,
        dec!(5000),
        deadline,
    );

    let product_repository = ProductRepository::new(db.pool.clone());
    let now = Utc::now().naive_utc();
    db.pool
        .execute(|conn| {
            product_repository.archive_in_tx(conn, &product.id, now, ARCHIVE_REASON_GOAL_NOT_MET)
        })
        .unwrap();

    // An extension staged before the archive committed must not move the
    // archived deadline.
    let err = db
        .pool
        .execute(|conn| {
            product_repository.extend_deadline_in_tx(
                conn,
                &product.id,
                ExtensionRecord {
                    previous_deadline: deadline,
                    new_deadline: deadline + Duration::days(7),
                    reason: "60 views in the last 7 days".to_string(),
                    requested_by: None,
                    timestamp: now,
                },
                false,
            )
        })
        .unwrap_err();
    assert_eq!(err.code(), "precondition-error");

    let archived = product_repository.get_by_id(&product.id).unwrap();
    assert_eq!(archived.status, ProductStatus::Archived);
    assert_eq!(archived.deadline, deadline);
    assert!(archived.extension_history.is_empty());
    assert_eq!(archived.manual_extension_count, 0);
}
