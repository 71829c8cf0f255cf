use std::time::Duration;

/// How long a cached price stays usable while the market is open.
pub const PRICE_CACHE_TTL: Duration = Duration::from_secs(5);

/// How long cached fundamentals stay usable, regardless of market state.
pub const FUNDAMENTALS_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Trailing sessions fetched when refreshing prices.
pub const HISTORY_WINDOW_DAYS: u32 = 5;

/// Total-return percentage at which a holding flips to SELL.
pub const SELL_RETURN_THRESHOLD_PCT: i64 = 30;

/// Growth-rate spans (in years) computed from annual statements.
pub const CAGR_SPANS_YEARS: [usize; 3] = [3, 5, 7];

/// Pause between symbol-search calls during bulk ticker discovery.
pub const DISCOVERY_PACING: Duration = Duration::from_millis(200);
