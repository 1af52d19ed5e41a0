//! Order endpoints for the recent-orders table.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::auth::CurrentSeller;
use crate::error::ApiError;
use crate::state::AppState;
use shared::{Order, OrderPayload, OrderStatusUpdate};

const DEFAULT_RECENT_LIMIT: u32 = 5;

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<u32>,
}

pub async fn recent(
    State(state): State<AppState>,
    seller: CurrentSeller,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<Order>>, ApiError> {
    info!("GET /api/orders/recent - query: {:?}", query);
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT).min(100);
    Ok(Json(state.orders.recent(&seller.id, limit).await?))
}

pub async fn create(
    State(state): State<AppState>,
    seller: CurrentSeller,
    Json(payload): Json<OrderPayload>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    info!("POST /api/orders");
    let created = state.orders.create(&seller.id, &payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_status(
    State(state): State<AppState>,
    seller: CurrentSeller,
    Path(id): Path<String>,
    Json(update): Json<OrderStatusUpdate>,
) -> Result<Json<Order>, ApiError> {
    info!("PUT /api/orders/{id}/status");
    Ok(Json(
        state.orders.update_status(&seller.id, &id, &update.status).await?,
    ))
}
