//! Submission and filter validation.
//!
//! Everything here is a pure pre-check: nothing is written, and the only
//! catalog read is the school existence lookup.

use rust_decimal::Decimal;
use serde_json::Value;

use super::quotations_errors::QuotationError;
use super::quotations_model::{
    NewQuotationLine, QuotationFilter, QuotationQuery, QuotationSubmission, SubmittedLine,
    ValidatedSubmission,
};
use crate::catalog::CatalogRepositoryTrait;
use crate::constants::UNSPECIFIED;
use crate::utils::decimal_utils::{decimal_from_json, integer_from_json};
use crate::utils::time_utils::{is_iso_datetime, normalize_iso_datetime};
use crate::Result;

const LINE_FIELDS: [&str; 6] = ["item_id", "name", "price", "unit", "quantity", "subtotal"];

static NULL: Value = Value::Null;

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn present(value: &Option<Value>) -> Option<&Value> {
    value.as_ref().filter(|v| !is_blank(v))
}

fn json_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Free-text fields accept any scalar; blank or absent means unspecified.
fn optional_text(value: &Option<Value>) -> String {
    present(value)
        .map(|v| json_text(v).trim().to_string())
        .unwrap_or_else(|| UNSPECIFIED.to_string())
}

fn parse_decimal(field: String, value: &Value) -> Result<Decimal> {
    decimal_from_json(value)
        .ok_or_else(|| QuotationError::invalid_number(field, json_text(value)).into())
}

fn parse_integer(field: String, value: &Value) -> Result<i64> {
    integer_from_json(value)
        .ok_or_else(|| QuotationError::invalid_number(field, json_text(value)).into())
}

fn line_field<'a>(line: &'a SubmittedLine, name: &str) -> Option<&'a Value> {
    let value = match name {
        "item_id" => &line.item_id,
        "name" => &line.name,
        "price" => &line.price,
        "unit" => &line.unit,
        "quantity" => &line.quantity,
        _ => &line.subtotal,
    };
    value.as_ref().filter(|v| !v.is_null())
}

/// Validates one submitted line. `index` is its position in `items`.
pub fn validate_line(index: usize, line: &SubmittedLine) -> Result<NewQuotationLine> {
    let missing: Vec<&str> = LINE_FIELDS
        .iter()
        .copied()
        .filter(|field| line_field(line, field).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(QuotationError::IncompleteLine {
            index,
            missing: missing.join(", "),
        }
        .into());
    }

    let field = |name: &str| line_field(line, name).unwrap_or(&NULL);
    let path = |name: &str| format!("items[{index}].{name}");

    let price = parse_decimal(path("price"), field("price"))?;
    let quantity = parse_integer(path("quantity"), field("quantity"))?;
    let subtotal = parse_decimal(path("subtotal"), field("subtotal"))?;

    let new_line = NewQuotationLine {
        item_id: parse_integer(path("item_id"), field("item_id"))?,
        name: json_text(field("name")),
        price,
        unit: json_text(field("unit")),
        quantity,
        subtotal,
    };
    new_line.validate(index)?;
    Ok(new_line)
}

/// Validates a raw submission against shape rules and school existence.
///
/// Checks run in a fixed order so the first failure is reported: required
/// fields, total price, repair time, school, then each line.
pub fn validate_submission(
    submission: &QuotationSubmission,
    catalog: &dyn CatalogRepositoryTrait,
) -> Result<ValidatedSubmission> {
    let school_id = present(&submission.school_id)
        .ok_or_else(|| QuotationError::MissingField("school_id".to_string()))?;
    let items = submission
        .items
        .as_ref()
        .filter(|items| !items.is_empty())
        .ok_or_else(|| QuotationError::MissingField("items".to_string()))?;
    let total_price = present(&submission.total_price)
        .ok_or_else(|| QuotationError::MissingField("total_price".to_string()))?;
    let repair_time = present(&submission.repair_time)
        .ok_or_else(|| QuotationError::MissingField("repair_time".to_string()))?;

    let total_price = parse_decimal("total_price".to_string(), total_price)?;

    let repair_time_text = json_text(repair_time);
    let repair_time = match repair_time {
        Value::String(s) => normalize_iso_datetime(s).ok(),
        _ => None,
    }
    .ok_or_else(|| QuotationError::InvalidTimestamp {
        field: "repair_time".to_string(),
        value: repair_time_text,
    })?;

    let school_id = parse_integer("school_id".to_string(), school_id)?;
    if catalog.get_school(school_id)?.is_none() {
        return Err(QuotationError::NotFound(format!("School {}", school_id)).into());
    }

    let lines = items
        .iter()
        .enumerate()
        .map(|(index, line)| validate_line(index, line))
        .collect::<Result<Vec<_>>>()?;

    Ok(ValidatedSubmission {
        school_id,
        repair_person: optional_text(&submission.repair_person),
        repair_location: optional_text(&submission.repair_location),
        repair_time,
        total_price,
        lines,
    })
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_bound(parameter: &str, value: &Option<String>) -> Result<Option<String>> {
    match non_empty(value) {
        None => Ok(None),
        Some(bound) if is_iso_datetime(bound) => Ok(Some(bound.to_string())),
        Some(bound) => Err(QuotationError::invalid_filter(parameter, bound).into()),
    }
}

fn parse_count(parameter: &str, value: &Option<String>) -> Result<Option<i64>> {
    match non_empty(value) {
        None => Ok(None),
        Some(raw) => match raw.parse::<i64>() {
            Ok(n) if n >= 0 => Ok(Some(n)),
            _ => Err(QuotationError::invalid_filter(parameter, raw).into()),
        },
    }
}

impl QuotationFilter {
    /// Parses raw query parameters. Empty values are treated as absent.
    ///
    /// Date bounds are checked for ISO-8601 shape but kept verbatim, since
    /// they are compared as strings against stored `created_at` values.
    pub fn from_query(query: &QuotationQuery) -> Result<Self> {
        let school_id = match non_empty(&query.school_id) {
            None => None,
            Some(raw) => Some(
                raw.parse::<i64>()
                    .map_err(|_| QuotationError::invalid_filter("school_id", raw))?,
            ),
        };

        Ok(Self {
            school_id,
            start: parse_bound("start", &query.start)?,
            end: parse_bound("end", &query.end)?,
            limit: parse_count("limit", &query.limit)?,
            offset: parse_count("offset", &query.offset)?,
        })
    }
}
