//! Product CRUD for the inventory page.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::auth::CurrentSeller;
use crate::error::ApiError;
use crate::state::AppState;
use shared::{InventoryStats, Product, ProductPayload};

pub async fn list(
    State(state): State<AppState>,
    seller: CurrentSeller,
) -> Result<Json<Vec<Product>>, ApiError> {
    info!("GET /api/products");
    Ok(Json(state.products.list(&seller.id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    seller: CurrentSeller,
    Json(payload): Json<ProductPayload>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    info!("POST /api/products");
    let created = state.products.create(&seller.id, &payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<AppState>,
    seller: CurrentSeller,
    Path(id): Path<String>,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<Product>, ApiError> {
    info!("PUT /api/products/{id}");
    Ok(Json(state.products.update(&seller.id, &id, &payload).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    seller: CurrentSeller,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    info!("DELETE /api/products/{id}");
    state.products.delete(&seller.id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn stats(
    State(state): State<AppState>,
    seller: CurrentSeller,
) -> Result<Json<InventoryStats>, ApiError> {
    info!("GET /api/products/stats");
    Ok(Json(state.products.stats(&seller.id).await?))
}
