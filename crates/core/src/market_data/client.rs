//! Market Data Client - facade for the market-data crate.
//!
//! This is the only place where the domain layer touches the provider
//! system. Provider errors cross into `crate::Error` here, so every caller
//! works with core results.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::errors::Result;
use foliotrack_market_data::{
    Candle, FinancialHistory, FundamentalsProfile, HistoryRange, MarketDataProvider, SymbolMatch,
};

/// Facade for fetching market data via the provider trait.
///
/// Holds an `Arc<dyn MarketDataProvider>` so tests can inject a scripted
/// provider instead of talking to the network.
pub struct MarketDataClient {
    provider: Arc<dyn MarketDataProvider>,
}

impl MarketDataClient {
    /// Creates a new client over the given provider.
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    /// Fetch the trailing price history for one symbol.
    pub async fn history(&self, symbol: &str, range: HistoryRange) -> Result<Vec<Candle>> {
        debug!("history({}, {})", symbol, range.range_token());
        Ok(self.provider.history(symbol, range).await?)
    }

    /// Fetch trailing price history for many symbols in one round trip.
    ///
    /// Symbols the source knows nothing about are absent from the map.
    pub async fn batch_history(
        &self,
        symbols: &[String],
        range: HistoryRange,
    ) -> Result<HashMap<String, Vec<Candle>>> {
        debug!("batch_history for {} symbols", symbols.len());
        Ok(self.provider.batch_history(symbols, range).await?)
    }

    /// Search for symbols matching the query.
    pub async fn search(&self, query: &str) -> Result<Vec<SymbolMatch>> {
        Ok(self.provider.search(query).await?)
    }

    /// Fetch valuation ratios for one symbol.
    pub async fn fundamentals(&self, symbol: &str) -> Result<FundamentalsProfile> {
        Ok(self.provider.fundamentals(symbol).await?)
    }

    /// Fetch annual revenue / net-income statements for one symbol.
    pub async fn financials(&self, symbol: &str) -> Result<FinancialHistory> {
        Ok(self.provider.financials(symbol).await?)
    }
}
