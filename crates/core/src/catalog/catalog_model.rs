//! Catalog domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{errors::ValidationError, Error, Result};

/// A school (institution) whose repair jobs are priced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    pub id: i64,
    pub name: String,
}

/// A priced service line offered at one school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairItem {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub unit: String,
    pub school_id: i64,
}

/// Input model for creating a school.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSchool {
    pub name: String,
}

impl NewSchool {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "name".to_string(),
            )));
        }
        Ok(())
    }
}

/// Input model for renaming a school.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolUpdate {
    pub name: String,
}

impl SchoolUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "name".to_string(),
            )));
        }
        Ok(())
    }
}

/// Input model for adding a price line to a school's catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRepairItem {
    pub school_id: i64,
    pub name: String,
    pub price: Decimal,
    pub unit: String,
}

impl NewRepairItem {
    /// Validates the new catalog line.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "name".to_string(),
            )));
        }
        if self.unit.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "unit".to_string(),
            )));
        }
        if self.price < Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Price cannot be negative".to_string(),
            )));
        }
        Ok(())
    }
}
