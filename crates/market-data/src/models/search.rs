//! Search result models for symbol lookup.

use serde::{Deserialize, Serialize};

/// One candidate from a ticker/symbol search.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SymbolMatch {
    /// Symbol/ticker (e.g., "RELIANCE.NS", "TCS.BO")
    pub symbol: String,

    /// Display name (e.g., "Reliance Industries Limited")
    pub name: String,

    /// Exchange name (e.g., "NSI", "BSE")
    pub exchange: String,

    /// Asset type (e.g., "EQUITY", "ETF")
    pub asset_type: String,
}

impl SymbolMatch {
    /// Create a new search candidate.
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        exchange: impl Into<String>,
        asset_type: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            exchange: exchange.into(),
            asset_type: asset_type.into(),
        }
    }
}
