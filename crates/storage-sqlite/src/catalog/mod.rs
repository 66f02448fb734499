//! SQLite storage implementation for schools and their catalog lines.

mod model;
mod repository;

pub use model::{NewRepairItemDB, NewSchoolDB, RepairItemDB, SchoolDB};
pub use repository::CatalogRepository;
