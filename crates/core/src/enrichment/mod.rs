//! Enrichment module - the portfolio read path.
//!
//! Takes stored holdings and attaches live market data to them: current
//! price, day change, total return, a sell/hold signal, and fundamental
//! ratios. Two in-memory caches (short-TTL prices, long-TTL fundamentals)
//! and a market-hours gate decide when the quote source is actually hit.

mod cache;
mod cagr;
mod enrichment_model;
mod enrichment_service;
pub mod market_hours;
mod rules;


pub use cache::{FundamentalsCache, PriceCache, PriceTick, TtlCache};
pub use cagr::cagr;
pub use enrichment_model::{EnrichedHolding, EnrichedHoldings, FundamentalRatios};
pub use enrichment_service::{HoldingsEnrichmentService, HoldingsEnrichmentServiceTrait};
pub use rules::HoldingState;
