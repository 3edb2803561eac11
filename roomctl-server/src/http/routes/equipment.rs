//! Equipment endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Deserialize;

use roomctl_core::{Equipment, EquipmentPatch, EquipmentStatus, NewEquipment};

use crate::http::error::ApiError;
use crate::http::extractors::{ValidJson, ValidQuery, ValidUuid};
use crate::http::server::AppState;

/// Optional `?status=` filter
#[derive(Deserialize)]
pub struct EquipmentFilter {
    pub status: Option<EquipmentStatus>,
}

/// GET /equipment
async fn list_equipment(
    State(state): State<Arc<AppState>>,
    ValidQuery(filter): ValidQuery<EquipmentFilter>,
) -> Result<Json<Vec<Equipment>>, ApiError> {
    let items = match filter.status {
        Some(status) => state.equipment.find_by_status(status).await?,
        None => state.equipment.find_all().await?,
    };
    Ok(Json(items))
}

/// POST /equipment
async fn create_equipment(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<NewEquipment>,
) -> Result<(StatusCode, Json<Equipment>), ApiError> {
    let item = state.equipment.create(req).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /equipment/{id}
async fn get_equipment(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<Equipment>, ApiError> {
    Ok(Json(state.equipment.find_by_id(id).await?))
}

/// PATCH /equipment/{id}
async fn update_equipment(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
    ValidJson(patch): ValidJson<EquipmentPatch>,
) -> Result<Json<Equipment>, ApiError> {
    Ok(Json(state.equipment.update(id, patch).await?))
}

/// DELETE /equipment/{id}
async fn delete_equipment(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<StatusCode, ApiError> {
    state.equipment.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Equipment routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/equipment", get(list_equipment).post(create_equipment))
        .route(
            "/equipment/{id}",
            get(get_equipment)
                .patch(update_equipment)
                .delete(delete_equipment),
        )
}
