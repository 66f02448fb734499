//! Quotation repository and service traits.
//!
//! These traits define the contract for quotation operations without any
//! database-specific types, allowing for different storage implementations.

use async_trait::async_trait;

use super::quotations_model::{
    NewQuotation, PriceEstimate, PriceEstimateRequest, Quotation, QuotationFilter,
    QuotationSubmission,
};
use crate::errors::Result;
use crate::export::SheetTable;

/// Trait defining the contract for quotation persistence.
#[async_trait]
pub trait QuotationRepositoryTrait: Send + Sync {
    /// Writes the header and every line in one transaction and returns the new id.
    ///
    /// Any failure, including a line that no longer validates, rolls the
    /// whole write back.
    async fn create(&self, new_quotation: NewQuotation) -> Result<i64>;

    /// Deletes the lines and then the header of a quotation in one transaction.
    ///
    /// Fails with not-found when the id is unknown. Returns the number of
    /// lines removed.
    async fn delete(&self, quotation_id: i64) -> Result<usize>;

    /// Fetches one quotation with all of its lines in insertion order.
    fn get_by_id(&self, quotation_id: i64) -> Result<Option<Quotation>>;

    /// Lists matching quotations, newest id first, each with all of its lines.
    fn list(&self, filter: &QuotationFilter) -> Result<Vec<Quotation>>;
}

/// Trait defining the contract for quotation service operations.
#[async_trait]
pub trait QuotationServiceTrait: Send + Sync {
    /// Estimates a total from catalog prices without persisting anything.
    fn compute_price(&self, request: &PriceEstimateRequest) -> Result<PriceEstimate>;

    /// Validates and persists a submission, returning what was stored.
    async fn submit_quotation(&self, submission: QuotationSubmission) -> Result<Quotation>;

    /// Deletes a quotation and all of its lines.
    async fn delete_quotation(&self, quotation_id: i64) -> Result<()>;

    /// Fetches a single fully hydrated quotation.
    fn get_quotation(&self, quotation_id: i64) -> Result<Quotation>;

    /// Lists quotations matching `filter`, latest first.
    fn list_quotations(&self, filter: &QuotationFilter) -> Result<Vec<Quotation>>;

    /// Builds the single-row spreadsheet table for one quotation.
    fn export_quotation(&self, quotation_id: i64) -> Result<SheetTable>;

    /// Builds the spreadsheet table for every quotation matching `filter`.
    fn export_quotations(&self, filter: &QuotationFilter) -> Result<SheetTable>;
}
