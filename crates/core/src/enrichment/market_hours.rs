//! Market-hours gate for the NSE trading window.
//!
//! Pure function of wall-clock time; used only to pick a caching policy,
//! never to block or queue requests.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use chrono_tz::Tz;

/// Timezone of the market's local clock.
pub const MARKET_TZ: Tz = chrono_tz::Asia::Kolkata;

/// Session bounds in seconds from local midnight (09:15 to 15:30).
const OPEN_SECS: u32 = 9 * 3600 + 15 * 60;
const CLOSE_SECS: u32 = 15 * 3600 + 30 * 60;

/// Whether the market is open at the given instant.
///
/// Open means a weekday with the local time inside the 09:15-15:30 session
/// window. Exchange holidays are not modelled; on a holiday the gate reports
/// open and the price fetch simply returns the last session's close.
pub fn is_market_open_at(instant: DateTime<Utc>) -> bool {
    let local = instant.with_timezone(&MARKET_TZ);
    if matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
        return false;
    }
    let secs = local.time().num_seconds_from_midnight();
    (OPEN_SECS..=CLOSE_SECS).contains(&secs)
}

/// Whether the market is open right now.
pub fn is_market_open() -> bool {
    is_market_open_at(Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ist(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        MARKET_TZ
            .with_ymd_and_hms(y, mo, d, h, mi, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_weekday_session_is_open() {
        // Monday mid-session
        assert!(is_market_open_at(ist(2025, 8, 25, 10, 0)));
        // Boundary instants are inside the window
        assert!(is_market_open_at(ist(2025, 8, 25, 9, 15)));
        assert!(is_market_open_at(ist(2025, 8, 25, 15, 30)));
    }

    #[test]
    fn test_outside_session_is_closed() {
        assert!(!is_market_open_at(ist(2025, 8, 25, 9, 14)));
        assert!(!is_market_open_at(ist(2025, 8, 25, 15, 31)));
        assert!(!is_market_open_at(ist(2025, 8, 25, 2, 0)));
    }

    #[test]
    fn test_weekend_is_closed() {
        assert!(!is_market_open_at(ist(2025, 8, 23, 11, 0))); // Saturday
        assert!(!is_market_open_at(ist(2025, 8, 24, 11, 0))); // Sunday
    }

    #[test]
    fn test_gate_follows_market_local_time() {
        // 05:00 UTC is 10:30 IST, inside the session even though the UTC
        // clock is well before any 09:15 open.
        let instant = Utc.with_ymd_and_hms(2025, 8, 25, 5, 0, 0).unwrap();
        assert!(is_market_open_at(instant));
    }
}
