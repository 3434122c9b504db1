use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::db::queries::{self, BookingFilter};
use crate::errors::AppError;
use crate::handlers::notify::dispatch_confirmation;
use crate::handlers::screens::{location_filter, parse_date};
use crate::models::{Booking, BookingView, Screen, SessionRole, User};
use crate::services::auth::{issue_session, verify_admin};
use crate::services::bookings::{self, AdminBookingRequest};
use crate::services::lifecycle::AdminAction;
use crate::services::seed;
use crate::session::AdminSession;
use crate::state::AppState;

// POST /api/admin/login
#[derive(Deserialize)]
pub struct AdminLoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AdminLoginResponse {
    token: String,
    expires_at: NaiveDateTime,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AdminLoginRequest>,
) -> Result<Json<AdminLoginResponse>, AppError> {
    let config = &state.config;
    if !verify_admin(
        &config.admin_username,
        &config.admin_password_hash,
        req.username.trim(),
        &req.password,
    ) {
        tracing::warn!(username = %req.username, "rejected staff login");
        return Err(AppError::Unauthorized);
    }

    let db = state.db()?;
    let session = issue_session(&db, &config.admin_username, SessionRole::Admin, config.session_ttl_hours)?;
    tracing::info!(username = %config.admin_username, "staff signed in");

    Ok(Json(AdminLoginResponse {
        token: session.token,
        expires_at: session.expires_at,
    }))
}

// GET /api/admin/bookings
#[derive(Deserialize)]
pub struct BookingsQuery {
    #[serde(default)]
    pub view: BookingView,
    pub location: Option<String>,
    /// Defaults to today at the venue. `any` lists every date.
    pub date: Option<String>,
}

pub async fn get_bookings(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let date = match query.date.as_deref().map(str::trim) {
        None | Some("") => Some(state.today()),
        Some(d) if d.eq_ignore_ascii_case("any") => None,
        Some(d) => Some(parse_date(d)?),
    };
    let filter = BookingFilter {
        view: query.view,
        location: location_filter(query.location.as_deref()).map(str::to_string),
        date,
    };

    let db = state.db()?;
    Ok(Json(queries::get_all_bookings(&db, &filter)?))
}

fn adjudicate(
    state: Arc<AppState>,
    id: &str,
    action: AdminAction,
) -> Result<Json<Booking>, AppError> {
    let booking = {
        let db = state.db()?;
        bookings::apply_admin_action(&db, id, action)?
    };

    if action == AdminAction::Confirm {
        dispatch_confirmation(state, &booking);
    }
    Ok(Json(booking))
}

// POST /api/admin/bookings/:id/confirm
pub async fn confirm_booking(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    adjudicate(state, &id, AdminAction::Confirm)
}

// POST /api/admin/bookings/:id/cancel
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    adjudicate(state, &id, AdminAction::Cancel)
}

// POST /api/admin/bookings/:id/restore
pub async fn restore_booking(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    adjudicate(state, &id, AdminAction::Restore)
}

// POST /api/admin/bookings/:id/undo
pub async fn undo_booking(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    adjudicate(state, &id, AdminAction::Undo)
}

// POST /api/admin/bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    admin: AdminSession,
    Json(req): Json<AdminBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let booking = {
        let db = state.db()?;
        bookings::create_booking_on_behalf(&db, &req)?
    };
    tracing::info!(booking_id = %booking.id, staff = %admin.username, "staff booking created");

    if booking.payment_confirmation {
        dispatch_confirmation(state, &booking);
    }
    Ok((StatusCode::CREATED, Json(booking)))
}

// GET /api/admin/users
pub async fn get_users(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
) -> Result<Json<Vec<User>>, AppError> {
    let db = state.db()?;
    Ok(Json(queries::list_users(&db)?))
}

// GET /api/admin/screens
pub async fn get_screens(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
) -> Result<Json<Vec<Screen>>, AppError> {
    let db = state.db()?;
    Ok(Json(queries::list_screens(&db, None)?))
}

// PUT /api/admin/screens/:id
pub async fn put_screen(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
    Path(id): Path<String>,
    Json(mut screen): Json<Screen>,
) -> Result<Json<Screen>, AppError> {
    screen.id = id;
    if screen.theme.trim().is_empty() || screen.location.trim().is_empty() {
        return Err(AppError::Validation(
            "screen theme and location are required".to_string(),
        ));
    }
    if let Some(packages) = &screen.packages {
        packages.validate()?;
    }

    let db = state.db()?;
    queries::upsert_screen(&db, &screen)?;
    tracing::info!(screen_id = %screen.id, "screen saved");
    Ok(Json(screen))
}

// POST /api/admin/screens/sync-packages
pub async fn sync_packages(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
) -> Result<Json<serde_json::Value>, AppError> {
    let db = state.db()?;
    let updated = seed::sync_packages(&db)?;
    Ok(Json(serde_json::json!({ "updated": updated })))
}
