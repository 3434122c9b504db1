use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Screen, Slot};
use crate::services::availability;
use crate::state::AppState;

/// "All" and blank both mean no location filter.
pub(crate) fn location_filter(location: Option<&str>) -> Option<&str> {
    location
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.eq_ignore_ascii_case("all"))
}

pub(crate) fn parse_date(date: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("date must be YYYY-MM-DD, got '{date}'")))
}

// GET /api/screens
#[derive(Deserialize)]
pub struct ScreensQuery {
    pub location: Option<String>,
}

pub async fn list_screens(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ScreensQuery>,
) -> Result<Json<Vec<Screen>>, AppError> {
    let db = state.db()?;
    let screens = queries::list_screens(&db, location_filter(query.location.as_deref()))?;
    Ok(Json(screens))
}

// GET /api/screens/:id
pub async fn get_screen(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Screen>, AppError> {
    let db = state.db()?;
    queries::get_screen(&db, &id)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("screen {id}")))
}

// GET /api/screens/:id/availability
#[derive(Deserialize)]
pub struct AvailabilityQuery {
    pub date: Option<String>,
}

#[derive(Serialize)]
pub struct AvailabilityResponse {
    screen_id: String,
    date: NaiveDate,
    unavailable: Vec<Slot>,
    available: Vec<Slot>,
}

pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let date = match query.date.as_deref() {
        Some(d) => parse_date(d)?,
        None => state.today(),
    };

    let db = state.db()?;
    if queries::get_screen(&db, &id)?.is_none() {
        return Err(AppError::NotFound(format!("screen {id}")));
    }
    let unavailable = availability::unavailable_slots(&db, &id, &date)?;

    Ok(Json(AvailabilityResponse {
        available: availability::available_slots(&unavailable),
        unavailable: unavailable.into_iter().collect(),
        screen_id: id,
        date,
    }))
}
