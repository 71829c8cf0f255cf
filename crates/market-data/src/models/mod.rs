//! Market data models
//!
//! This module contains the core data types for market data operations:
//! - `candle` - Price history data (Candle, HistoryRange)
//! - `fundamentals` - Valuation ratios and annual statements
//!   (FundamentalsProfile, FinancialHistory, AnnualValue)
//! - `search` - Search result data (SymbolMatch)

mod candle;
mod fundamentals;
mod search;

pub use candle::{Candle, HistoryRange};
pub use fundamentals::{AnnualValue, FinancialHistory, FundamentalsProfile};
pub use search::SymbolMatch;
