/// Benchmark indicator ids consumed by the rate sync job
pub const INDICATOR_POLICY_RATE: &str = "policy_rate";
pub const INDICATOR_TREASURY_1Y: &str = "treasury_1y";

/// Backup values (annual percentage points) used when an indicator fetch
/// fails; the sync job never fails solely on upstream unavailability
pub const BACKUP_POLICY_RATE: &str = "3.50";
pub const BACKUP_TREASURY_1Y: &str = "3.20";

/// Platform spread added on top of the benchmark policy rate
/// (annual percentage points)
pub const RATE_SPREAD: &str = "1.50";

/// Indicator snapshot source labels
pub const INDICATOR_SOURCE_MARKET: &str = "market";
pub const INDICATOR_SOURCE_BACKUP: &str = "backup";

/// Days used to convert an annual percentage rate to a daily fraction
pub const DAYS_PER_YEAR: u32 = 365;
