//! Customer CRUD for the customers page.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::auth::CurrentSeller;
use crate::error::ApiError;
use crate::state::AppState;
use shared::{Customer, CustomerPayload, CustomerStats};

pub async fn list(
    State(state): State<AppState>,
    seller: CurrentSeller,
) -> Result<Json<Vec<Customer>>, ApiError> {
    info!("GET /api/customers");
    Ok(Json(state.customers.list(&seller.id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    seller: CurrentSeller,
    Json(payload): Json<CustomerPayload>,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    info!("POST /api/customers");
    let created = state.customers.create(&seller.id, &payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<AppState>,
    seller: CurrentSeller,
    Path(id): Path<String>,
    Json(payload): Json<CustomerPayload>,
) -> Result<Json<Customer>, ApiError> {
    info!("PUT /api/customers/{id}");
    Ok(Json(state.customers.update(&seller.id, &id, &payload).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    seller: CurrentSeller,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    info!("DELETE /api/customers/{id}");
    state.customers.delete(&seller.id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn stats(
    State(state): State<AppState>,
    seller: CurrentSeller,
) -> Result<Json<CustomerStats>, ApiError> {
    info!("GET /api/customers/stats");
    Ok(Json(state.customers.stats(&seller.id).await?))
}
