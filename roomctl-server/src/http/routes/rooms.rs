//! Room endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use roomctl_core::{NewRoom, Room, RoomPatch};

use crate::http::error::ApiError;
use crate::http::extractors::{ValidId, ValidJson};
use crate::http::server::AppState;

/// GET /rooms
async fn list_rooms(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Room>>, ApiError> {
    Ok(Json(state.rooms.find_all().await?))
}

/// POST /rooms
async fn create_room(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<NewRoom>,
) -> Result<(StatusCode, Json<Room>), ApiError> {
    let room = state.rooms.create(req).await?;
    Ok((StatusCode::CREATED, Json(room)))
}

/// GET /rooms/{id}
async fn get_room(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Room>, ApiError> {
    Ok(Json(state.rooms.find_by_id(id).await?))
}

/// PATCH /rooms/{id}
async fn update_room(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ValidJson(patch): ValidJson<RoomPatch>,
) -> Result<Json<Room>, ApiError> {
    Ok(Json(state.rooms.update(id, patch).await?))
}

/// DELETE /rooms/{id}
async fn delete_room(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<StatusCode, ApiError> {
    state.rooms.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Room routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/rooms", get(list_rooms).post(create_room))
        .route(
            "/rooms/{id}",
            get(get_room).patch(update_room).delete(delete_room),
        )
}
