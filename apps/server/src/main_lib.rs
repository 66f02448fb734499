use std::sync::Arc;

use crate::config::Config;
use repairquote_core::{
    catalog::{CatalogService, CatalogServiceTrait},
    export::{CsvSheetRenderer, QuotationRenderer},
    quotations::{QuotationService, QuotationServiceTrait},
    utils::time_utils::{Clock, SystemClock},
};
use repairquote_storage_sqlite::{
    catalog::CatalogRepository,
    db::{self, write_actor},
    quotations::QuotationRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub catalog_service: Arc<dyn CatalogServiceTrait>,
    pub quotation_service: Arc<dyn QuotationServiceTrait>,
    pub renderer: Arc<dyn QuotationRenderer>,
    pub clock: Arc<dyn Clock>,
}

pub fn init_tracing() {
    let log_format = std::env::var("RQ_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer((*pool).clone());

    let catalog_repo = Arc::new(CatalogRepository::new(pool.clone(), writer.clone()));
    let quotation_repo = Arc::new(QuotationRepository::new(pool.clone(), writer.clone()));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let catalog_service = Arc::new(CatalogService::new(catalog_repo.clone()));
    let added = catalog_service.ensure_sentinel_items().await?;
    if added > 0 {
        tracing::info!("Added the fallback line to {} school(s)", added);
    }

    let quotation_service = Arc::new(QuotationService::with_clock(
        catalog_repo,
        quotation_repo,
        clock.clone(),
    ));

    Ok(Arc::new(AppState {
        catalog_service,
        quotation_service,
        renderer: Arc::new(CsvSheetRenderer),
        clock,
    }))
}
