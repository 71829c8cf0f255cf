//! Market data provider trait definitions.
//!
//! This module defines the core `MarketDataProvider` trait that all
//! market data providers must implement.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{
    Candle, FinancialHistory, FundamentalsProfile, HistoryRange, SymbolMatch,
};

/// Trait for market data providers.
///
/// Implement this trait to add support for a new market data source. The
/// domain layer depends on this trait only, so tests inject scripted
/// implementations instead of talking to the network.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "YAHOO". Used for logging and
    /// error attribution.
    fn id(&self) -> &'static str;

    /// Fetch the trailing price history for one symbol.
    ///
    /// # Arguments
    ///
    /// * `symbol` - The exchange symbol (e.g., "RELIANCE.NS")
    /// * `range` - Trailing lookback window
    ///
    /// # Returns
    ///
    /// Candles ordered by timestamp ascending, or a `MarketDataError`.
    /// An empty window surfaces as `NoDataForRange`, never as `Ok(vec![])`.
    async fn history(
        &self,
        symbol: &str,
        range: HistoryRange,
    ) -> Result<Vec<Candle>, MarketDataError>;

    /// Fetch trailing price history for many symbols in one round trip.
    ///
    /// # Returns
    ///
    /// A map from symbol to ascending candles. Symbols the source knows
    /// nothing about are simply absent from the map; per-symbol gaps are
    /// not errors at this level. The call errors only when the batch
    /// request itself fails.
    async fn batch_history(
        &self,
        symbols: &[String],
        range: HistoryRange,
    ) -> Result<HashMap<String, Vec<Candle>>, MarketDataError>;

    /// Search for symbols matching the query.
    ///
    /// # Arguments
    ///
    /// * `query` - The search query (an ISIN, a symbol, or a company name)
    ///
    /// # Returns
    ///
    /// Candidates in the source's relevance order; may be empty.
    async fn search(&self, query: &str) -> Result<Vec<SymbolMatch>, MarketDataError>;

    /// Fetch valuation ratios for one symbol.
    async fn fundamentals(&self, symbol: &str)
        -> Result<FundamentalsProfile, MarketDataError>;

    /// Fetch annual revenue / net-income statements for one symbol.
    ///
    /// The window should reach back far enough for multi-year growth math
    /// (eight fiscal years).
    async fn financials(&self, symbol: &str) -> Result<FinancialHistory, MarketDataError>;
}
