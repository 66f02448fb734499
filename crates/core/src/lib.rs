//! Repair Quote Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic for recording repair price catalogs
//! and producing immutable quotations from them. It is database-agnostic and
//! defines traits that are implemented by the `storage-sqlite` crate.

pub mod catalog;
pub mod constants;
pub mod errors;
pub mod export;
pub mod quotations;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::ErrorKind;
pub use errors::Result;
