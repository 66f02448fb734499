use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use repairquote_core::export::batch_file_name;
use repairquote_core::quotations::{
    PriceEstimate, PriceEstimateRequest, Quotation, QuotationFilter, QuotationQuery,
    QuotationSubmission,
};
use serde_json::json;

use crate::{error::ApiResult, main_lib::AppState};

async fn calculate_price(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PriceEstimateRequest>, JsonRejection>,
) -> ApiResult<Json<PriceEstimate>> {
    let Json(request) = body?;
    let estimate = state.quotation_service.compute_price(&request)?;
    Ok(Json(estimate))
}

async fn submit_quotation(
    State(state): State<Arc<AppState>>,
    body: Result<Json<QuotationSubmission>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Quotation>)> {
    let Json(submission) = body?;
    let quotation = state.quotation_service.submit_quotation(submission).await?;
    Ok((StatusCode::CREATED, Json(quotation)))
}

async fn list_quotations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QuotationQuery>,
) -> ApiResult<Json<Vec<Quotation>>> {
    let filter = QuotationFilter::from_query(&query)?;
    let quotations = state.quotation_service.list_quotations(&filter)?;
    Ok(Json(quotations))
}

async fn get_quotation(
    Path(id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Quotation>> {
    let quotation = state.quotation_service.get_quotation(id)?;
    Ok(Json(quotation))
}

async fn delete_quotation(
    Path(id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<serde_json::Value>> {
    state.quotation_service.delete_quotation(id).await?;
    Ok(Json(json!({ "message": format!("Quotation {} deleted", id) })))
}

fn attachment(state: &AppState, file_name: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, state.renderer.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        bytes,
    )
        .into_response()
}

async fn export_quotation(
    Path(id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Response> {
    let table = state.quotation_service.export_quotation(id)?;
    let bytes = state.renderer.render(&table)?;
    let file_name = state.renderer.file_name(&table);
    Ok(attachment(&state, &file_name, bytes))
}

async fn export_quotations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QuotationQuery>,
) -> ApiResult<Response> {
    let filter = QuotationFilter::from_query(&query)?;
    let table = state.quotation_service.export_quotations(&filter)?;
    let bytes = state.renderer.render(&table)?;
    let file_name = batch_file_name(state.renderer.as_ref(), state.clock.now());
    Ok(attachment(&state, &file_name, bytes))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/calculate_price", post(calculate_price))
        .route("/quotations", get(list_quotations).post(submit_quotation))
        .route("/quotations/export", get(export_quotations))
        .route("/quotations/{id}", get(get_quotation).delete(delete_quotation))
        .route("/quotations/{id}/export", get(export_quotation))
}
