//! SQLite storage implementation for repair catalogs and quotations.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `repairquote-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for schools, catalog lines, and quotations
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! The `core` crate is database-agnostic and works with traits.
//!
//! ```text
//!        core (domain)
//!              │
//!              ▼
//!   storage-sqlite (this crate)
//!              │
//!              ▼
//!          SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;

// Repository implementations
pub mod catalog;
pub mod quotations;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use catalog::CatalogRepository;
pub use quotations::QuotationRepository;

// Re-export from repairquote-core for convenience
pub use repairquote_core::errors::{DatabaseError, Error, Result};
