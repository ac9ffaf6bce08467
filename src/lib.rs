//! Settlement and reconciliation core for the Makerfund marketplace.
//!
//! Designers upload products, investors fund them from their wallets, and
//! scheduled jobs reconcile product lifecycle state against time and
//! activity. This crate owns the money-moving paths and the jobs:
//!
//! - [`settlement`]: atomic transfer of funds from an investor's wallet
//!   into a product's funding balance;
//! - [`interest`]: daily interest accrual on wallet balances and the
//!   market-derived daily rate;
//! - [`reconciliation`]: archiving of products that missed their funding
//!   deadline;
//! - [`extensions`]: deadline extensions for trending products.
//!
//! Storefront, dashboards, and notification rendering are external
//! callers of these services. Scheduled jobs assume at-most-once
//! invocation per period by the external scheduler.

pub mod constants;
pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

pub mod extensions;
pub mod identity;
pub mod interest;
pub mod investments;
pub mod ledger;
pub mod notifications;
pub mod products;
pub mod reconciliation;
pub mod settlement;
pub mod system_logs;
pub mod wallets;

pub use errors::{Error, Result};
