//! Foliotrack Core - Domain entities, services, and traits.
//!
//! This crate contains the core business logic for Foliotrack.
//! It is database-agnostic and defines repository traits that are
//! implemented by the `storage-sqlite` crate, and talks to the quote
//! source through the provider trait exposed by `market-data`.

pub mod constants;
pub mod discovery;
pub mod enrichment;
pub mod errors;
pub mod holdings;
pub mod import;
pub mod market_data;
pub mod portfolios;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
