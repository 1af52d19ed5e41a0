//! Appointment mutations driven by the scheduling form, plus the
//! dashboard stats card.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Local;
use tracing::info;

use crate::auth::CurrentSeller;
use crate::error::ApiError;
use crate::state::AppState;
use shared::{Appointment, AppointmentPayload, DashboardStats};

/// Insert; the owning seller comes from the session, never the payload.
pub async fn create(
    State(state): State<AppState>,
    seller: CurrentSeller,
    Json(payload): Json<AppointmentPayload>,
) -> Result<(StatusCode, Json<Appointment>), ApiError> {
    info!("POST /api/appointments");
    let created = state.appointments.create(&seller.id, &payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Full replace of the mutable fields, keyed by id.
pub async fn update(
    State(state): State<AppState>,
    seller: CurrentSeller,
    Path(id): Path<String>,
    Json(payload): Json<AppointmentPayload>,
) -> Result<Json<Appointment>, ApiError> {
    info!("PUT /api/appointments/{id}");
    Ok(Json(state.appointments.update(&seller.id, &id, &payload).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    seller: CurrentSeller,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    info!("DELETE /api/appointments/{id}");
    state.appointments.delete(&seller.id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Count and revenue sum of appointments from today onward.
pub async fn dashboard_stats(
    State(state): State<AppState>,
    seller: CurrentSeller,
) -> Result<Json<DashboardStats>, ApiError> {
    info!("GET /api/dashboard/stats");
    let today = Local::now().date_naive();
    Ok(Json(state.appointments.upcoming_stats(&seller.id, today).await?))
}
