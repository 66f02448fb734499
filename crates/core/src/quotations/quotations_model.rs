//! Quotation domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::quotations_errors::QuotationError;
use crate::Result;

/// Frozen copy of a catalog line as it was quoted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotationLine {
    pub id: i64,
    pub quotation_id: i64,
    /// Source catalog line; recorded only, never joined against.
    pub item_id: i64,
    pub name: String,
    pub price: Decimal,
    pub unit: String,
    pub quantity: i64,
    /// Stored exactly as submitted, not recomputed from price and quantity.
    pub subtotal: Decimal,
}

/// Immutable, numbered quotation with its line snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quotation {
    pub id: i64,
    pub quotation_number: String,
    pub school_id: i64,
    /// School name captured at creation time.
    pub school_name: String,
    pub repair_person: String,
    pub repair_location: String,
    pub repair_time: String,
    /// Lines in insertion order.
    #[serde(rename = "items")]
    pub lines: Vec<QuotationLine>,
    pub total_price: Decimal,
    pub created_at: String,
}

/// A validated line ready to be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuotationLine {
    pub item_id: i64,
    pub name: String,
    pub price: Decimal,
    pub unit: String,
    pub quantity: i64,
    pub subtotal: Decimal,
}

impl NewQuotationLine {
    /// Re-checks the line inside a write; `index` names it in errors.
    pub fn validate(&self, index: usize) -> Result<()> {
        if self.price < Decimal::ZERO {
            return Err(QuotationError::negative(format!("items[{index}].price"), self.price).into());
        }
        if self.quantity < 0 {
            return Err(
                QuotationError::negative(format!("items[{index}].quantity"), self.quantity).into(),
            );
        }
        if self.subtotal < Decimal::ZERO {
            return Err(
                QuotationError::negative(format!("items[{index}].subtotal"), self.subtotal).into(),
            );
        }
        Ok(())
    }
}

/// Header and lines for one write attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuotation {
    pub quotation_number: String,
    pub school_id: i64,
    pub school_name: String,
    pub repair_person: String,
    pub repair_location: String,
    pub repair_time: String,
    pub total_price: Decimal,
    pub created_at: String,
    pub lines: Vec<NewQuotationLine>,
}

impl NewQuotation {
    /// Checks the header-level invariant that a quotation has lines.
    pub fn validate(&self) -> Result<()> {
        if self.lines.is_empty() {
            return Err(QuotationError::MissingField("items".to_string()).into());
        }
        Ok(())
    }
}

/// Raw line as sent by a client. Any field may be absent or mistyped.
///
/// Entries that are not JSON objects deserialize with every field absent, so
/// they are reported as incomplete lines instead of failing the whole body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct SubmittedLine {
    pub item_id: Option<Value>,
    pub name: Option<Value>,
    pub price: Option<Value>,
    pub unit: Option<Value>,
    pub quantity: Option<Value>,
    pub subtotal: Option<Value>,
}

impl From<Value> for SubmittedLine {
    fn from(value: Value) -> Self {
        let Value::Object(mut fields) = value else {
            return Self::default();
        };
        let mut take = |name: &str| fields.remove(name);
        Self {
            item_id: take("item_id"),
            name: take("name"),
            price: take("price"),
            unit: take("unit"),
            quantity: take("quantity"),
            subtotal: take("subtotal"),
        }
    }
}

/// Raw quotation submission as sent by a client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuotationSubmission {
    pub school_id: Option<Value>,
    pub repair_person: Option<Value>,
    pub repair_location: Option<Value>,
    pub repair_time: Option<Value>,
    pub total_price: Option<Value>,
    pub items: Option<Vec<SubmittedLine>>,
}

/// Output of the validator: every field parsed and typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSubmission {
    pub school_id: i64,
    pub repair_person: String,
    pub repair_location: String,
    /// Parsed and re-serialised repair time.
    pub repair_time: String,
    pub total_price: Decimal,
    pub lines: Vec<NewQuotationLine>,
}

/// Raw list/export query parameters as they arrive from a query string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuotationQuery {
    pub school_id: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// Parsed quotation filter. `Default` selects everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuotationFilter {
    pub school_id: Option<i64>,
    /// Inclusive lower bound on `created_at`, compared as a string.
    pub start: Option<String>,
    /// Inclusive upper bound on `created_at`, compared as a string.
    pub end: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl QuotationFilter {
    pub fn for_school(school_id: i64) -> Self {
        Self {
            school_id: Some(school_id),
            ..Self::default()
        }
    }
}

/// One row of an interactive price estimate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceSelection {
    pub school_id: Option<Value>,
    pub item_id: Option<Value>,
    pub quantity: Option<Value>,
}

/// Request body of the price estimator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceEstimateRequest {
    pub items: Option<Vec<PriceSelection>>,
}

/// Result of the price estimator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceEstimate {
    pub total_price: Decimal,
}
