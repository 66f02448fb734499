//! Database models for quotations.

use diesel::prelude::*;

use repairquote_core::quotations::{NewQuotation, NewQuotationLine, Quotation, QuotationLine};
use repairquote_core::utils::decimal_utils::parse_stored_decimal;

/// Quotation header row.
#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::quotations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct QuotationDB {
    pub id: i64,
    pub quotation_number: String,
    pub school_id: i64,
    pub school_name: String,
    pub repair_person: String,
    pub repair_location: String,
    pub repair_time: String,
    pub total_price: String,
    pub created_at: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::quotations)]
pub struct NewQuotationDB {
    pub quotation_number: String,
    pub school_id: i64,
    pub school_name: String,
    pub repair_person: String,
    pub repair_location: String,
    pub repair_time: String,
    pub total_price: String,
    pub created_at: String,
}

/// Line snapshot row.
#[derive(Queryable, Identifiable, Associations, Selectable, PartialEq, Debug, Clone)]
#[diesel(belongs_to(QuotationDB, foreign_key = quotation_id))]
#[diesel(table_name = crate::schema::quotation_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct QuotationItemDB {
    pub id: i64,
    pub quotation_id: i64,
    pub item_id: i64,
    pub name: String,
    pub price: String,
    pub unit: String,
    pub quantity: i64,
    pub subtotal: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::quotation_items)]
pub struct NewQuotationItemDB {
    pub quotation_id: i64,
    pub item_id: i64,
    pub name: String,
    pub price: String,
    pub unit: String,
    pub quantity: i64,
    pub subtotal: String,
}

impl NewQuotationItemDB {
    pub fn from_line(quotation_id: i64, line: &NewQuotationLine) -> Self {
        Self {
            quotation_id,
            item_id: line.item_id,
            name: line.name.clone(),
            price: line.price.to_string(),
            unit: line.unit.clone(),
            quantity: line.quantity,
            subtotal: line.subtotal.to_string(),
        }
    }
}

impl From<&NewQuotation> for NewQuotationDB {
    fn from(domain: &NewQuotation) -> Self {
        Self {
            quotation_number: domain.quotation_number.clone(),
            school_id: domain.school_id,
            school_name: domain.school_name.clone(),
            repair_person: domain.repair_person.clone(),
            repair_location: domain.repair_location.clone(),
            repair_time: domain.repair_time.clone(),
            total_price: domain.total_price.to_string(),
            created_at: domain.created_at.clone(),
        }
    }
}

impl From<QuotationItemDB> for QuotationLine {
    fn from(db: QuotationItemDB) -> Self {
        Self {
            id: db.id,
            quotation_id: db.quotation_id,
            item_id: db.item_id,
            price: parse_stored_decimal(&db.price, "quotation_items.price"),
            subtotal: parse_stored_decimal(&db.subtotal, "quotation_items.subtotal"),
            name: db.name,
            unit: db.unit,
            quantity: db.quantity,
        }
    }
}

impl QuotationDB {
    /// Assembles the domain quotation from its header and ordered lines.
    pub fn into_domain(self, lines: Vec<QuotationItemDB>) -> Quotation {
        Quotation {
            id: self.id,
            total_price: parse_stored_decimal(&self.total_price, "quotations.total_price"),
            quotation_number: self.quotation_number,
            school_id: self.school_id,
            school_name: self.school_name,
            repair_person: self.repair_person,
            repair_location: self.repair_location,
            repair_time: self.repair_time,
            lines: lines.into_iter().map(QuotationLine::from).collect(),
            created_at: self.created_at,
        }
    }
}
