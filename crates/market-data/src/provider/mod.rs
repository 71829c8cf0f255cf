//! Market data provider abstraction and implementations.
//!
//! This module contains:
//! - The `MarketDataProvider` trait that all providers implement
//! - The Yahoo Finance implementation
//!
//! The domain layer never names a concrete provider; it holds an
//! `Arc<dyn MarketDataProvider>` and lets construction-time wiring pick
//! the implementation.

mod traits;

pub mod yahoo;

pub use traits::MarketDataProvider;
