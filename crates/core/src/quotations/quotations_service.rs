use log::{debug, error, info, warn};
use std::sync::Arc;

use super::quotations_errors::QuotationError;
use super::quotations_model::{
    NewQuotation, PriceEstimate, PriceEstimateRequest, Quotation, QuotationFilter,
    QuotationSubmission, ValidatedSubmission,
};
use super::quotations_pricing::PricingResolver;
use super::quotations_traits::{QuotationRepositoryTrait, QuotationServiceTrait};
use super::quotations_validation::validate_submission;
use crate::catalog::CatalogRepositoryTrait;
use crate::constants::MAX_QUOTATION_NUMBER_ATTEMPTS;
use crate::errors::{Error, Result};
use crate::export::{quotation_sheet, quotations_sheet, SheetTable};
use crate::utils::time_utils::{format_created_at, quotation_number, Clock, SystemClock};

/// Service for creating, querying, and deleting quotations.
pub struct QuotationService {
    catalog: Arc<dyn CatalogRepositoryTrait>,
    repository: Arc<dyn QuotationRepositoryTrait>,
    pricing: PricingResolver,
    clock: Arc<dyn Clock>,
}

impl QuotationService {
    /// Creates a new QuotationService reading the system clock
    pub fn new(
        catalog: Arc<dyn CatalogRepositoryTrait>,
        repository: Arc<dyn QuotationRepositoryTrait>,
    ) -> Self {
        Self::with_clock(catalog, repository, Arc::new(SystemClock))
    }

    pub fn with_clock(
        catalog: Arc<dyn CatalogRepositoryTrait>,
        repository: Arc<dyn QuotationRepositoryTrait>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            pricing: PricingResolver::new(catalog.clone()),
            catalog,
            repository,
            clock,
        }
    }

    /// Builds the write for one numbering attempt.
    ///
    /// The school is looked up again so the stored name is the one current at
    /// write time, even if validation ran against an older view.
    fn prepare(&self, validated: &ValidatedSubmission, attempt: u32) -> Result<NewQuotation> {
        let school = self
            .catalog
            .get_school(validated.school_id)?
            .ok_or_else(|| QuotationError::NotFound(format!("School {}", validated.school_id)))?;
        let now = self.clock.now();

        Ok(NewQuotation {
            quotation_number: quotation_number(now, attempt),
            school_id: school.id,
            school_name: school.name,
            repair_person: validated.repair_person.clone(),
            repair_location: validated.repair_location.clone(),
            repair_time: validated.repair_time.clone(),
            total_price: validated.total_price,
            created_at: format_created_at(now),
            lines: validated.lines.clone(),
        })
    }

    /// Runs the write, retrying with a fresh number on a number collision only.
    async fn write_with_retry(&self, validated: &ValidatedSubmission) -> Result<i64> {
        let mut attempt = 0;
        loop {
            let new_quotation = self.prepare(validated, attempt)?;
            let number = new_quotation.quotation_number.clone();

            match self.repository.create(new_quotation).await {
                Ok(id) => {
                    debug!("Stored quotation {} as id {}", number, id);
                    return Ok(id);
                }
                Err(e) if e.is_unique_violation() && attempt + 1 < MAX_QUOTATION_NUMBER_ATTEMPTS => {
                    warn!(
                        "Quotation number {} already taken (attempt {}), retrying",
                        number,
                        attempt + 1
                    );
                    attempt += 1;
                }
                Err(e) => {
                    if !e.kind().is_client_error() {
                        error!("Failed to store quotation {}: {}", number, e);
                    }
                    return Err(e);
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl QuotationServiceTrait for QuotationService {
    fn compute_price(&self, request: &PriceEstimateRequest) -> Result<PriceEstimate> {
        self.pricing.compute_price(request)
    }

    async fn submit_quotation(&self, submission: QuotationSubmission) -> Result<Quotation> {
        let validated = validate_submission(&submission, self.catalog.as_ref())?;
        let quotation_id = self.write_with_retry(&validated).await?;

        // Read back from the store so the caller sees exactly what was committed.
        let quotation = self.repository.get_by_id(quotation_id)?.ok_or_else(|| {
            Error::Unexpected(format!(
                "Quotation {} vanished right after it was committed",
                quotation_id
            ))
        })?;

        info!(
            "Created quotation {} for school {} with {} line(s)",
            quotation.quotation_number,
            quotation.school_id,
            quotation.lines.len()
        );
        Ok(quotation)
    }

    async fn delete_quotation(&self, quotation_id: i64) -> Result<()> {
        let removed_lines = self.repository.delete(quotation_id).await?;
        info!(
            "Deleted quotation {} and {} line(s)",
            quotation_id, removed_lines
        );
        Ok(())
    }

    fn get_quotation(&self, quotation_id: i64) -> Result<Quotation> {
        self.repository
            .get_by_id(quotation_id)?
            .ok_or_else(|| QuotationError::NotFound(format!("Quotation {}", quotation_id)).into())
    }

    fn list_quotations(&self, filter: &QuotationFilter) -> Result<Vec<Quotation>> {
        self.repository.list(filter)
    }

    fn export_quotation(&self, quotation_id: i64) -> Result<SheetTable> {
        let quotation = self.get_quotation(quotation_id)?;
        Ok(quotation_sheet(&quotation))
    }

    fn export_quotations(&self, filter: &QuotationFilter) -> Result<SheetTable> {
        let quotations = self.repository.list(filter)?;
        if quotations.is_empty() {
            return Err(
                QuotationError::NotFound("No quotations match the export filter".to_string())
                    .into(),
            );
        }
        Ok(quotations_sheet(&quotations))
    }
}
