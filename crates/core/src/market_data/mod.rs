//! Market data module - facade over the provider crate.

mod client;

pub use client::MarketDataClient;
