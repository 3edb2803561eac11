//! Employee endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use roomctl_core::{Employee, EmployeePatch, NewEmployee};

use crate::http::error::ApiError;
use crate::http::extractors::{ValidId, ValidJson};
use crate::http::server::AppState;

/// GET /employees
async fn list_employees(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Employee>>, ApiError> {
    Ok(Json(state.employees.find_all().await?))
}

/// POST /employees
async fn create_employee(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<NewEmployee>,
) -> Result<(StatusCode, Json<Employee>), ApiError> {
    let employee = state.employees.create(req).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

/// GET /employees/{id}
async fn get_employee(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Employee>, ApiError> {
    Ok(Json(state.employees.find_by_id(id).await?))
}

/// GET /users/{id}/employee
async fn get_user_employee(
    State(state): State<Arc<AppState>>,
    ValidId(user_id): ValidId,
) -> Result<Json<Employee>, ApiError> {
    Ok(Json(state.employees.find_by_user_id(user_id).await?))
}

/// PATCH /employees/{id}
async fn update_employee(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ValidJson(patch): ValidJson<EmployeePatch>,
) -> Result<Json<Employee>, ApiError> {
    Ok(Json(state.employees.update(id, patch).await?))
}

/// DELETE /employees/{id}
async fn delete_employee(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<StatusCode, ApiError> {
    state.employees.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Employee routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route(
            "/employees/{id}",
            get(get_employee)
                .patch(update_employee)
                .delete(delete_employee),
        )
        .route("/users/{id}/employee", get(get_user_employee))
}
