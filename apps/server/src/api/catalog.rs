use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use repairquote_core::catalog::{NewRepairItem, NewSchool, RepairItem, School, SchoolUpdate};

use crate::{error::ApiResult, main_lib::AppState};

async fn list_schools(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<School>>> {
    let schools = state.catalog_service.list_schools()?;
    Ok(Json(schools))
}

async fn create_school(
    State(state): State<Arc<AppState>>,
    Json(new_school): Json<NewSchool>,
) -> ApiResult<(StatusCode, Json<School>)> {
    let school = state.catalog_service.create_school(new_school).await?;
    Ok((StatusCode::CREATED, Json(school)))
}

async fn rename_school(
    Path(id): Path<i64>,
    State(state): State<Arc<AppState>>,
    Json(update): Json<SchoolUpdate>,
) -> ApiResult<Json<School>> {
    let school = state.catalog_service.rename_school(id, update).await?;
    Ok(Json(school))
}

async fn list_items(
    Path(id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<RepairItem>>> {
    let items = state.catalog_service.list_items(id)?;
    Ok(Json(items))
}

async fn add_item(
    State(state): State<Arc<AppState>>,
    Json(new_item): Json<NewRepairItem>,
) -> ApiResult<(StatusCode, Json<RepairItem>)> {
    let item = state.catalog_service.add_item(new_item).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/schools", get(list_schools).post(create_school))
        .route("/schools/{id}", put(rename_school))
        .route("/schools/{id}/items", get(list_items))
        .route("/items", post(add_item))
}
