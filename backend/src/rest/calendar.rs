//! The window fetch behind the scheduling view.

use axum::{extract::Query, extract::State, Json};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use tracing::info;

use crate::auth::CurrentSeller;
use crate::domain::calendar;
use crate::error::ApiError;
use crate::state::AppState;
use shared::{CalendarMode, CalendarResponse};

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    /// Reference date, `yyyy-MM-dd`; defaults to today.
    pub date: Option<String>,
    /// Week- or month-anchored window; defaults to month.
    pub mode: Option<CalendarMode>,
}

/// One request returns the whole visible window: appointments joined with
/// their summaries, plus both selector lists.
pub async fn window(
    State(state): State<AppState>,
    seller: CurrentSeller,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>, ApiError> {
    info!("GET /api/calendar - query: {:?}", query);

    let reference = match &query.date {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| ApiError::validation("date must be yyyy-MM-dd"))?,
        None => Local::now().date_naive(),
    };
    let mode = query.mode.unwrap_or(CalendarMode::Month);
    let (start, end) = calendar::window(reference, mode);

    let appointments = state.appointments.list_range(&seller.id, start, end).await?;
    let days = calendar::group_by_day(start, end, &appointments);
    let customers = state.customers.list(&seller.id).await?;
    let products = state.products.list_available(&seller.id).await?;

    Ok(Json(CalendarResponse {
        start: start.format("%Y-%m-%d").to_string(),
        end: end.format("%Y-%m-%d").to_string(),
        appointments,
        days,
        customers,
        products,
    }))
}
