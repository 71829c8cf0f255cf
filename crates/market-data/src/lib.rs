//! Foliotrack Market Data Crate
//!
//! Provider-facing market data fetching for Foliotrack: trailing price
//! history (single-symbol and batched), symbol search, valuation ratios and
//! annual financial statements.
//!
//! # Overview
//!
//! The crate exposes one seam, the [`MarketDataProvider`] trait. The domain
//! layer owns *when* to fetch and *how* to cache; this crate owns *how* to
//! talk to the quote source:
//!
//! ```text
//! +--------------------+
//! |    Domain Layer    |  (enrichment, discovery)
//! +--------------------+
//!           |
//!           v
//! +--------------------+
//! | MarketDataProvider |  (trait seam, mockable in tests)
//! +--------------------+
//!           |
//!           v
//! +--------------------+
//! |   YahooProvider    |  (chart / spark / search / quoteSummary / timeseries)
//! +--------------------+
//! ```
//!
//! # Core Types
//!
//! - [`Candle`] - one trading session of price data (close always present,
//!   open/high/low/volume where the endpoint supplies them)
//! - [`HistoryRange`] - trailing lookback window for history requests
//! - [`SymbolMatch`] - one symbol-search candidate
//! - [`FundamentalsProfile`] - valuation ratios for a symbol
//! - [`FinancialHistory`] - annual revenue / net-income series

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::{FailureClass, MarketDataError};
pub use models::{
    AnnualValue, Candle, FinancialHistory, FundamentalsProfile, HistoryRange, SymbolMatch,
};
pub use provider::yahoo::YahooProvider;
pub use provider::MarketDataProvider;
