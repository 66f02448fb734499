//! Catalog module - schools, their repair price lines, and the traits the
//! quotation engine reads them through.

mod catalog_model;
mod catalog_service;
mod catalog_traits;


// Re-export the public interface
pub use catalog_model::{NewRepairItem, NewSchool, RepairItem, School, SchoolUpdate};
pub use catalog_service::CatalogService;
pub use catalog_traits::{CatalogRepositoryTrait, CatalogServiceTrait};
