//! Interactive price estimator.
//!
//! Unlike submission, estimation never rejects individual rows: a selection
//! that cannot be resolved contributes nothing to the total.

use log::warn;
use rust_decimal::Decimal;
use std::sync::Arc;

use super::quotations_errors::QuotationError;
use super::quotations_model::{PriceEstimate, PriceEstimateRequest, PriceSelection};
use crate::catalog::CatalogRepositoryTrait;
use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::utils::decimal_utils::{integer_from_json, round_half_up};
use crate::Result;

/// Resolves selections against the live catalog and totals them.
pub struct PricingResolver {
    catalog: Arc<dyn CatalogRepositoryTrait>,
}

impl PricingResolver {
    pub fn new(catalog: Arc<dyn CatalogRepositoryTrait>) -> Self {
        Self { catalog }
    }

    /// Parses a selection into `(school_id, item_id, quantity)`, or `None`
    /// when it should be skipped.
    fn resolve_ids(selection: &PriceSelection) -> Option<(i64, i64, i64)> {
        let id = |value: &Option<serde_json::Value>| {
            value
                .as_ref()
                .and_then(integer_from_json)
                .filter(|id| *id > 0)
        };
        let school_id = id(&selection.school_id)?;
        let item_id = id(&selection.item_id)?;
        let quantity = selection
            .quantity
            .as_ref()
            .and_then(integer_from_json)
            .filter(|q| *q > 0)?;
        Some((school_id, item_id, quantity))
    }

    /// Totals `unit_price * quantity` over every resolvable selection,
    /// rounded half-up to two places.
    ///
    /// Only a request without a selection list is rejected. Store failures
    /// still propagate.
    pub fn compute_price(&self, request: &PriceEstimateRequest) -> Result<PriceEstimate> {
        let selections = request
            .items
            .as_ref()
            .ok_or_else(|| QuotationError::MissingField("items".to_string()))?;

        let mut total = Decimal::ZERO;
        for selection in selections {
            let Some((school_id, item_id, quantity)) = Self::resolve_ids(selection) else {
                warn!("Skipping unresolvable price selection: {:?}", selection);
                continue;
            };

            let Some(item) = self.catalog.get_item(school_id, item_id)? else {
                warn!(
                    "Catalog line {} not found for school {}. Skipping in price estimate.",
                    item_id, school_id
                );
                continue;
            };

            match item
                .price
                .checked_mul(Decimal::from(quantity))
                .and_then(|subtotal| total.checked_add(subtotal))
            {
                Some(sum) => total = sum,
                None => warn!(
                    "Price of {} x catalog line {} overflows. Skipping in price estimate.",
                    quantity, item_id
                ),
            }
        }

        Ok(PriceEstimate {
            total_price: round_half_up(total, DISPLAY_DECIMAL_PRECISION),
        })
    }
}
