/// Singleton row id for the interest rate settings document
pub const RATE_SETTINGS_ID: &str = "default";

/// Decimal precision for currency amounts
pub const CURRENCY_DECIMAL_PRECISION: u32 = 2;

/// Decimal precision for stored daily interest rates
pub const RATE_DECIMAL_PRECISION: u32 = 8;

/// Trailing window over which trend metrics are computed (days)
pub const TREND_WINDOW_DAYS: i64 = 7;

/// How far a deadline is pushed out by one extension (days)
pub const EXTENSION_DAYS: i64 = 7;

/// Auto-extension only considers products whose deadline falls within
/// this many days from now
pub const AUTO_EXTENSION_HORIZON_DAYS: i64 = 7;

/// Trending thresholds for the automatic extension job
pub const AUTO_VIEWS_THRESHOLD: i64 = 50;
pub const AUTO_INVESTMENTS_THRESHOLD: i64 = 3;
pub const AUTO_AMOUNT_THRESHOLD: &str = "1000";

/// Lower thresholds for the designer-requested manual extension
pub const MANUAL_VIEWS_THRESHOLD: i64 = 30;
pub const MANUAL_INVESTMENTS_THRESHOLD: i64 = 2;
pub const MANUAL_AMOUNT_THRESHOLD: &str = "500";

/// A designer may manually extend a product's deadline at most this many times
pub const MANUAL_EXTENSION_LIMIT: i32 = 1;
