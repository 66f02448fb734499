use thiserror::Error;

use crate::errors::ErrorKind;

/// Failures raised while validating, writing, or querying quotations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuotationError {
    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Field '{field}' is not a valid number: {value}")]
    InvalidNumber { field: String, value: String },

    #[error("Field '{field}' is not a valid date-time: {value}")]
    InvalidTimestamp { field: String, value: String },

    #[error("Field '{field}' cannot be negative: {value}")]
    NegativeValue { field: String, value: String },

    #[error("Line items[{index}] is incomplete, missing: {missing}")]
    IncompleteLine { index: usize, missing: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid filter '{parameter}': {value}")]
    InvalidFilter { parameter: String, value: String },
}

impl QuotationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            QuotationError::MissingField(_) => ErrorKind::MissingField,
            QuotationError::InvalidNumber { .. } => ErrorKind::InvalidNumber,
            QuotationError::InvalidTimestamp { .. } => ErrorKind::InvalidTimestamp,
            QuotationError::NegativeValue { .. } => ErrorKind::NegativeValue,
            QuotationError::IncompleteLine { .. } => ErrorKind::IncompleteLine,
            QuotationError::NotFound(_) => ErrorKind::NotFound,
            QuotationError::InvalidFilter { .. } => ErrorKind::InvalidFilter,
        }
    }

    pub(crate) fn invalid_number(field: impl Into<String>, value: impl ToString) -> Self {
        QuotationError::InvalidNumber {
            field: field.into(),
            value: value.to_string(),
        }
    }

    pub(crate) fn negative(field: impl Into<String>, value: impl ToString) -> Self {
        QuotationError::NegativeValue {
            field: field.into(),
            value: value.to_string(),
        }
    }

    pub(crate) fn invalid_filter(parameter: impl Into<String>, value: impl Into<String>) -> Self {
        QuotationError::InvalidFilter {
            parameter: parameter.into(),
            value: value.into(),
        }
    }
}
