//! Analytics aggregates over a date range.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use crate::auth::CurrentSeller;
use crate::error::ApiError;
use crate::state::AppState;
use shared::AnalyticsSummary;

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    pub start: String,
    pub end: String,
}

pub async fn summary(
    State(state): State<AppState>,
    seller: CurrentSeller,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsSummary>, ApiError> {
    info!("GET /api/analytics - query: {:?}", query);

    let start = parse_date(&query.start)?;
    let end = parse_date(&query.end)?;
    if end < start {
        return Err(ApiError::validation("end must not be before start"));
    }

    Ok(Json(state.analytics.summary(&seller.id, start, end).await?))
}

fn parse_date(raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::validation("dates must be yyyy-MM-dd"))
}
