//! Holding domain models.
//!
//! A holding is identified by the (portfolio_id, isin) pair. Manual fields
//! (quantity, buy price, target, stop-loss, exit date) are the user's; the
//! `last_*` snapshot fields are the last market data we persisted, used as
//! the cross-restart price fallback when live data is unavailable.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Domain model representing one equity holding inside a portfolio.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub portfolio_id: String,
    pub isin: String,
    pub stock_name: String,
    pub ticker: Option<String>,
    pub quantity: i32,
    pub average_buy_price: Decimal,
    pub target: Option<Decimal>,
    pub stop_loss: Option<Decimal>,
    pub date_of_exit: Option<NaiveDate>,
    /// Last persisted market snapshot, if any.
    pub last_price: Option<Decimal>,
    pub last_day_change_amount: Option<Decimal>,
    pub last_day_change_percent: Option<Decimal>,
    pub market_data_updated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input model for adding a single holding.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewHolding {
    pub portfolio_id: String,
    pub isin: String,
    pub stock_name: String,
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default)]
    pub average_buy_price: Decimal,
}

/// Partial settings update keyed by (portfolio_id, isin).
///
/// Only fields present in the request change; absent fields keep their
/// stored value.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct HoldingSettingsUpdate {
    pub portfolio_id: String,
    pub isin: String,
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub date_of_exit: Option<NaiveDate>,
    #[serde(default)]
    pub target: Option<Decimal>,
    #[serde(default)]
    pub stop_loss: Option<Decimal>,
    #[serde(default)]
    pub quantity: Option<i32>,
    #[serde(default)]
    pub average_buy_price: Option<Decimal>,
}

/// Fresh market data written back to a holding after enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldingSnapshot {
    pub portfolio_id: String,
    pub isin: String,
    pub last_price: Decimal,
    pub last_day_change_amount: Decimal,
    pub last_day_change_percent: Decimal,
    pub market_data_updated_at: DateTime<Utc>,
}

/// Full upsert row used by the spreadsheet importer.
///
/// Carries the imported fields plus the merged per-ISIN settings, so a
/// re-upload never erases manually curated values. Snapshot columns are not
/// part of the upsert and keep whatever the store already has.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldingUpsert {
    pub portfolio_id: String,
    pub isin: String,
    pub stock_name: String,
    pub ticker: Option<String>,
    pub quantity: i32,
    pub average_buy_price: Decimal,
    pub target: Option<Decimal>,
    pub stop_loss: Option<Decimal>,
    pub date_of_exit: Option<NaiveDate>,
}
