//! Quotations module - submission validation, price estimation, and the
//! service that numbers and persists immutable quotations.

mod quotations_errors;
mod quotations_model;
mod quotations_pricing;
mod quotations_service;
mod quotations_traits;
mod quotations_validation;

#[cfg(test)]
mod quotations_service_tests;

// Re-export the public interface
pub use quotations_errors::QuotationError;
pub use quotations_model::{
    NewQuotation, NewQuotationLine, PriceEstimate, PriceEstimateRequest, PriceSelection,
    Quotation, QuotationFilter, QuotationLine, QuotationQuery, QuotationSubmission,
    SubmittedLine, ValidatedSubmission,
};
pub use quotations_pricing::PricingResolver;
pub use quotations_service::QuotationService;
pub use quotations_traits::{QuotationRepositoryTrait, QuotationServiceTrait};
pub use quotations_validation::{validate_line, validate_submission};
