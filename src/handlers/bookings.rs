use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::Booking;
use crate::services::bookings::{self, BookingRequest};
use crate::session::CustomerSession;
use crate::state::AppState;

// POST /api/bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    session: CustomerSession,
    Json(req): Json<BookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let db = state.db()?;
    let booking = bookings::create_booking(&db, &session.user, &req)?;
    Ok((StatusCode::CREATED, Json(booking)))
}

// GET /api/bookings
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    session: CustomerSession,
) -> Result<Json<Vec<Booking>>, AppError> {
    let db = state.db()?;
    Ok(Json(queries::get_bookings_for_user(&db, &session.user.id)?))
}

// GET /api/bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    session: CustomerSession,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    let db = state.db()?;
    let booking = bookings::get_customer_booking(&db, &session.user.id, &id)?;
    Ok(Json(booking))
}

// POST /api/bookings/:id/payment-proof
#[derive(Deserialize)]
pub struct PaymentProofRequest {
    #[serde(default)]
    pub payment_proof: String,
}

pub async fn submit_payment_proof(
    State(state): State<Arc<AppState>>,
    session: CustomerSession,
    Path(id): Path<String>,
    Json(req): Json<PaymentProofRequest>,
) -> Result<Json<Booking>, AppError> {
    let db = state.db()?;
    let booking = bookings::submit_payment_proof(&db, &session.user.id, &id, &req.payment_proof)?;
    Ok(Json(booking))
}
