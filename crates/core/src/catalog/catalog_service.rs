use log::{debug, info};
use std::sync::Arc;

use super::catalog_model::{NewRepairItem, NewSchool, RepairItem, School, SchoolUpdate};
use super::catalog_traits::{CatalogRepositoryTrait, CatalogServiceTrait};
use crate::errors::{DatabaseError, Error, Result};

/// Service for the catalog master data the quotation engine reads.
pub struct CatalogService {
    repository: Arc<dyn CatalogRepositoryTrait>,
}

impl CatalogService {
    /// Creates a new CatalogService instance
    pub fn new(repository: Arc<dyn CatalogRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn require_school(&self, school_id: i64) -> Result<School> {
        self.repository.get_school(school_id)?.ok_or_else(|| {
            Error::Database(DatabaseError::NotFound(format!("School {}", school_id)))
        })
    }
}

#[async_trait::async_trait]
impl CatalogServiceTrait for CatalogService {
    fn list_schools(&self) -> Result<Vec<School>> {
        self.repository.list_schools()
    }

    fn list_items(&self, school_id: i64) -> Result<Vec<RepairItem>> {
        self.require_school(school_id)?;
        self.repository.list_items(school_id)
    }

    async fn create_school(&self, new_school: NewSchool) -> Result<School> {
        new_school.validate()?;
        let school = self.repository.create_school(new_school).await?;
        info!("Created school {} ({})", school.id, school.name);
        Ok(school)
    }

    async fn rename_school(&self, school_id: i64, update: SchoolUpdate) -> Result<School> {
        update.validate()?;
        self.require_school(school_id)?;
        self.repository.rename_school(school_id, update).await
    }

    async fn add_item(&self, new_item: NewRepairItem) -> Result<RepairItem> {
        new_item.validate()?;
        self.require_school(new_item.school_id)?;
        debug!(
            "Adding catalog line '{}' to school {}",
            new_item.name, new_item.school_id
        );
        self.repository.create_item(new_item).await
    }

    async fn ensure_sentinel_items(&self) -> Result<usize> {
        let added = self.repository.ensure_sentinel_items().await?;
        if added > 0 {
            info!("Added fallback catalog line to {} school(s)", added);
        }
        Ok(added)
    }
}
