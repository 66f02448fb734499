//! SQLite storage implementation for quotations and their line snapshots.

mod model;
mod repository;

pub use model::{NewQuotationDB, NewQuotationItemDB, QuotationDB, QuotationItemDB};
pub use repository::QuotationRepository;
