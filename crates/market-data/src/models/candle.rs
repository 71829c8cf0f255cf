use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Trailing lookback window for history requests.
///
/// Expressed in days of trading data; rendered as a "5d"-style range token
/// on the wire.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HistoryRange(u32);

impl HistoryRange {
    /// A window covering the given number of trailing days.
    pub const fn days(n: u32) -> Self {
        Self(n)
    }

    /// The range token used by the quote source ("5d", "30d", ...).
    pub fn range_token(&self) -> String {
        format!("{}d", self.0)
    }
}

/// One trading session of price data.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Candle {
    /// Timestamp of the session
    pub timestamp: DateTime<Utc>,

    /// Opening price (absent on close-only series)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<Decimal>,

    /// High price (absent on close-only series)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<Decimal>,

    /// Low price (absent on close-only series)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<Decimal>,

    /// Closing price (required)
    pub close: Decimal,

    /// Trading volume (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<Decimal>,
}

impl Candle {
    /// Create a close-only candle, as returned by batched spark series.
    pub fn new(timestamp: DateTime<Utc>, close: Decimal) -> Self {
        Self {
            timestamp,
            open: None,
            high: None,
            low: None,
            close,
            volume: None,
        }
    }

    /// Create a full OHLCV candle.
    pub fn ohlcv(
        timestamp: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
    ) -> Self {
        Self {
            timestamp,
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close,
            volume: Some(volume),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_candle_new() {
        let candle = Candle::new(Utc::now(), dec!(1520.45));
        assert_eq!(candle.close, dec!(1520.45));
        assert!(candle.open.is_none());
        assert!(candle.volume.is_none());
    }

    #[test]
    fn test_candle_ohlcv() {
        let candle = Candle::ohlcv(
            Utc::now(),
            dec!(1500.00),
            dec!(1535.00),
            dec!(1498.50),
            dec!(1520.45),
            dec!(250000),
        );
        assert_eq!(candle.open, Some(dec!(1500.00)));
        assert_eq!(candle.high, Some(dec!(1535.00)));
        assert_eq!(candle.low, Some(dec!(1498.50)));
        assert_eq!(candle.close, dec!(1520.45));
        assert_eq!(candle.volume, Some(dec!(250000)));
    }

    #[test]
    fn test_range_token() {
        assert_eq!(HistoryRange::days(5).range_token(), "5d");
        assert_eq!(HistoryRange::days(30).range_token(), "30d");
    }
}
