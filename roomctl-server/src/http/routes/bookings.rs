//! Booking endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use roomctl_core::{Booking, BookingPatch, NewBooking};

use crate::http::error::ApiError;
use crate::http::extractors::{ValidId, ValidJson};
use crate::http::server::AppState;

/// GET /bookings
async fn list_bookings(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Booking>>, ApiError> {
    Ok(Json(state.bookings.find_all().await?))
}

/// POST /bookings
async fn create_booking(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<NewBooking>,
) -> Result<(StatusCode, Json<Booking>), ApiError> {
    let booking = state.bookings.create(req).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// GET /bookings/{id}
async fn get_booking(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Booking>, ApiError> {
    Ok(Json(state.bookings.find_by_id(id).await?))
}

/// GET /users/{id}/bookings
async fn list_user_bookings(
    State(state): State<Arc<AppState>>,
    ValidId(user_id): ValidId,
) -> Result<Json<Vec<Booking>>, ApiError> {
    Ok(Json(state.bookings.find_by_user_id(user_id).await?))
}

/// PATCH /bookings/{id}
async fn update_booking(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ValidJson(patch): ValidJson<BookingPatch>,
) -> Result<Json<Booking>, ApiError> {
    Ok(Json(state.bookings.update(id, patch).await?))
}

/// DELETE /bookings/{id}
async fn delete_booking(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<StatusCode, ApiError> {
    state.bookings.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Booking routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/bookings", get(list_bookings).post(create_booking))
        .route(
            "/bookings/{id}",
            get(get_booking).patch(update_booking).delete(delete_booking),
        )
        .route("/users/{id}/bookings", get(list_user_bookings))
}
