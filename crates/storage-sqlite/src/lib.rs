//! SQLite storage implementation for Foliotrack.
//!
//! This crate provides all database-related functionality using Diesel ORM
//! with SQLite. It implements the repository traits defined in
//! `foliotrack-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for portfolios and holdings
//! - Database-specific model types (with Diesel derives)
//!
//! This crate is the only place in the application where Diesel dependencies
//! exist. Everything above it is database-agnostic and works with traits.
//! Reads go straight to the r2d2 pool; all writes funnel through a single
//! writer actor so SQLite never sees two concurrent write transactions.

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod holdings;
pub mod portfolios;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from foliotrack-core for convenience
pub use foliotrack_core::errors::{DatabaseError, Error, Result};
