//! Database models for holdings.
//!
//! Decimal columns are stored as TEXT to keep exact values across the
//! SQLite boundary; conversion happens in the `From` impls here.

use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::portfolios::PortfolioDB;
use foliotrack_core::holdings::{Holding, HoldingUpsert, NewHolding};

/// Database model for holdings
#[derive(
    Insertable,
    Queryable,
    Identifiable,
    Associations,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(belongs_to(PortfolioDB, foreign_key = portfolio_id))]
#[diesel(table_name = crate::schema::holdings)]
#[diesel(treat_none_as_default_value = false)]
#[diesel(primary_key(portfolio_id, isin))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct HoldingDB {
    pub portfolio_id: String,
    pub isin: String,
    pub stock_name: String,
    pub ticker: Option<String>,
    pub quantity: i32,
    pub average_buy_price: String,
    pub target: Option<String>,
    pub stop_loss: Option<String>,
    pub date_of_exit: Option<NaiveDate>,
    pub last_price: Option<String>,
    pub last_day_change_amount: Option<String>,
    pub last_day_change_percent: Option<String>,
    pub market_data_updated_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Changeset for the settings update; `None` fields are left untouched.
#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = crate::schema::holdings)]
pub struct HoldingSettingsDB {
    pub ticker: Option<String>,
    pub date_of_exit: Option<NaiveDate>,
    pub target: Option<String>,
    pub stop_loss: Option<String>,
    pub quantity: Option<i32>,
    pub average_buy_price: Option<String>,
    pub updated_at: NaiveDateTime,
}

fn decimal_from_text(text: &str) -> Decimal {
    Decimal::from_str(text).unwrap_or_default()
}

fn optional_decimal(text: &Option<String>) -> Option<Decimal> {
    text.as_deref().map(decimal_from_text)
}

// Conversion to domain model
impl From<HoldingDB> for Holding {
    fn from(db: HoldingDB) -> Self {
        Self {
            portfolio_id: db.portfolio_id,
            isin: db.isin,
            stock_name: db.stock_name,
            ticker: db.ticker,
            quantity: db.quantity,
            average_buy_price: decimal_from_text(&db.average_buy_price),
            target: optional_decimal(&db.target),
            stop_loss: optional_decimal(&db.stop_loss),
            date_of_exit: db.date_of_exit,
            last_price: optional_decimal(&db.last_price),
            last_day_change_amount: optional_decimal(&db.last_day_change_amount),
            last_day_change_percent: optional_decimal(&db.last_day_change_percent),
            market_data_updated_at: db
                .market_data_updated_at
                .map(|t| Utc.from_utc_datetime(&t)),
            created_at: Utc.from_utc_datetime(&db.created_at),
            updated_at: Utc.from_utc_datetime(&db.updated_at),
        }
    }
}

impl HoldingDB {
    /// Fresh row for a manually added holding.
    pub fn from_new(new_holding: NewHolding) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            portfolio_id: new_holding.portfolio_id,
            isin: new_holding.isin,
            stock_name: new_holding.stock_name,
            ticker: new_holding.ticker,
            quantity: new_holding.quantity,
            average_buy_price: new_holding.average_buy_price.to_string(),
            target: None,
            stop_loss: None,
            date_of_exit: None,
            last_price: None,
            last_day_change_amount: None,
            last_day_change_percent: None,
            market_data_updated_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Row for an import upsert; snapshot columns start empty and are only
    /// meaningful on insert, the conflict path leaves them alone.
    pub fn from_upsert(row: HoldingUpsert) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            portfolio_id: row.portfolio_id,
            isin: row.isin,
            stock_name: row.stock_name,
            ticker: row.ticker,
            quantity: row.quantity,
            average_buy_price: row.average_buy_price.to_string(),
            target: row.target.map(|d| d.to_string()),
            stop_loss: row.stop_loss.map(|d| d.to_string()),
            date_of_exit: row.date_of_exit,
            last_price: None,
            last_day_change_amount: None,
            last_day_change_percent: None,
            market_data_updated_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}
