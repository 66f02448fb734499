//! Catalog repository and service traits.
//!
//! The quotation engine only ever reads the catalog; the write methods exist
//! for the master-data collaborator that maintains it.

use async_trait::async_trait;

use super::catalog_model::{NewRepairItem, NewSchool, RepairItem, School, SchoolUpdate};
use crate::errors::Result;

/// Trait defining the contract for catalog persistence.
#[async_trait]
pub trait CatalogRepositoryTrait: Send + Sync {
    /// Looks up a school, `None` when the id is unknown.
    fn get_school(&self, school_id: i64) -> Result<Option<School>>;

    /// Lists every school ordered by id.
    fn list_schools(&self) -> Result<Vec<School>>;

    /// Looks up a catalog line by its owning school and its own id.
    fn get_item(&self, school_id: i64, item_id: i64) -> Result<Option<RepairItem>>;

    /// Lists the catalog lines of a school ordered by id.
    fn list_items(&self, school_id: i64) -> Result<Vec<RepairItem>>;

    /// Creates a school together with its zero-priced "Other" line.
    async fn create_school(&self, new_school: NewSchool) -> Result<School>;

    /// Renames a school. Existing quotations keep their snapshot name.
    async fn rename_school(&self, school_id: i64, update: SchoolUpdate) -> Result<School>;

    /// Adds a line to a school's catalog.
    async fn create_item(&self, new_item: NewRepairItem) -> Result<RepairItem>;

    /// Adds the "Other" line to every school missing it.
    ///
    /// Returns the number of lines inserted.
    async fn ensure_sentinel_items(&self) -> Result<usize>;
}

/// Trait defining the contract for catalog service operations.
#[async_trait]
pub trait CatalogServiceTrait: Send + Sync {
    fn list_schools(&self) -> Result<Vec<School>>;

    /// Lists a school's catalog, failing with not-found for unknown schools.
    fn list_items(&self, school_id: i64) -> Result<Vec<RepairItem>>;

    async fn create_school(&self, new_school: NewSchool) -> Result<School>;

    async fn rename_school(&self, school_id: i64, update: SchoolUpdate) -> Result<School>;

    async fn add_item(&self, new_item: NewRepairItem) -> Result<RepairItem>;

    async fn ensure_sentinel_items(&self) -> Result<usize>;
}
