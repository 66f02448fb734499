//! Database models for the catalog.

use diesel::prelude::*;
use rust_decimal::Decimal;

use repairquote_core::catalog::{NewRepairItem, RepairItem, School};
use repairquote_core::constants::{OTHER_ITEM_NAME, OTHER_ITEM_UNIT};
use repairquote_core::utils::decimal_utils::parse_stored_decimal;

#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::schools)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SchoolDB {
    pub id: i64,
    pub name: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::schools)]
pub struct NewSchoolDB {
    pub name: String,
}

/// Catalog line row. Prices are stored as decimal text.
#[derive(Queryable, Identifiable, Associations, Selectable, PartialEq, Debug, Clone)]
#[diesel(belongs_to(SchoolDB, foreign_key = school_id))]
#[diesel(table_name = crate::schema::repair_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RepairItemDB {
    pub id: i64,
    pub name: String,
    pub price: String,
    pub unit: String,
    pub school_id: i64,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::repair_items)]
pub struct NewRepairItemDB {
    pub name: String,
    pub price: String,
    pub unit: String,
    pub school_id: i64,
}

impl NewRepairItemDB {
    /// The zero-priced fallback line every school carries.
    pub fn sentinel(school_id: i64) -> Self {
        Self {
            name: OTHER_ITEM_NAME.to_string(),
            price: Decimal::ZERO.to_string(),
            unit: OTHER_ITEM_UNIT.to_string(),
            school_id,
        }
    }
}

// Conversion to domain models
impl From<SchoolDB> for School {
    fn from(db: SchoolDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
        }
    }
}

impl From<RepairItemDB> for RepairItem {
    fn from(db: RepairItemDB) -> Self {
        Self {
            id: db.id,
            price: parse_stored_decimal(&db.price, "repair_items.price"),
            name: db.name,
            unit: db.unit,
            school_id: db.school_id,
        }
    }
}

// Conversion from domain models
impl From<NewRepairItem> for NewRepairItemDB {
    fn from(domain: NewRepairItem) -> Self {
        Self {
            name: domain.name.trim().to_string(),
            price: domain.price.to_string(),
            unit: domain.unit.trim().to_string(),
            school_id: domain.school_id,
        }
    }
}
