use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{DisplayTheme, SessionRole, User};
use crate::services::auth::issue_session;
use crate::session::{bearer_token, CustomerSession};
use crate::state::AppState;

#[derive(Serialize)]
pub struct AuthResponse {
    token: String,
    expires_at: NaiveDateTime,
    user: User,
}

fn start_session(state: &AppState, user: User) -> Result<AuthResponse, AppError> {
    let db = state.db()?;
    let session = issue_session(
        &db,
        &user.id,
        SessionRole::Customer,
        state.config.session_ttl_hours,
    )?;
    Ok(AuthResponse {
        token: session.token,
        expires_at: session.expires_at,
        user,
    })
}

// POST /api/auth/register
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: String,
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let email = req.email.trim();
    let name = req.name.trim();
    let phone = req.phone.trim();
    if email.is_empty() || name.is_empty() || phone.is_empty() || req.password.is_empty() {
        return Err(AppError::Validation(
            "name, email, phone and password are required".to_string(),
        ));
    }

    let user_id = state.credentials.register(email, &req.password).await?;

    let user = User {
        id: user_id,
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        created_at: Utc::now().naive_utc(),
        previous_bookings: vec![],
        display_theme: DisplayTheme::default(),
    };
    {
        let db = state.db()?;
        queries::insert_user(&db, &user)?;
    }
    tracing::info!(user_id = %user.id, "customer registered");

    Ok((StatusCode::CREATED, Json(start_session(&state, user)?)))
}

// POST /api/auth/login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = req.email.trim();
    let user_id = state.credentials.sign_in(email, &req.password).await?;

    let user = {
        let db = state.db()?;
        match queries::get_user(&db, &user_id)? {
            Some(user) => user,
            None => {
                // Account exists upstream but has no profile row yet. Booking
                // stays refused until a phone is set through /api/me/preferences.
                let user = User {
                    id: user_id,
                    name: email.split('@').next().unwrap_or_default().to_string(),
                    email: email.to_string(),
                    phone: String::new(),
                    created_at: Utc::now().naive_utc(),
                    previous_bookings: vec![],
                    display_theme: DisplayTheme::default(),
                };
                queries::insert_user(&db, &user)?;
                user
            }
        }
    };

    Ok(Json(start_session(&state, user)?))
}

// POST /api/auth/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let token = bearer_token(&headers).ok_or(AppError::Unauthorized)?;
    let removed = {
        let db = state.db()?;
        queries::delete_session(&db, token)?
    };
    Ok(Json(serde_json::json!({"ok": removed})))
}

// GET /api/me
pub async fn me(session: CustomerSession) -> Json<User> {
    Json(session.user)
}

// PUT /api/me/preferences
#[derive(Deserialize)]
pub struct PreferencesRequest {
    pub display_theme: Option<DisplayTheme>,
    pub phone: Option<String>,
}

pub async fn update_preferences(
    State(state): State<Arc<AppState>>,
    session: CustomerSession,
    Json(req): Json<PreferencesRequest>,
) -> Result<Json<User>, AppError> {
    let phone = match req.phone.as_deref().map(str::trim) {
        Some("") => return Err(AppError::Validation("phone must not be empty".to_string())),
        other => other,
    };

    let db = state.db()?;
    if let Some(theme) = req.display_theme {
        queries::update_display_theme(&db, &session.user.id, theme)?;
    }
    if let Some(phone) = phone {
        queries::update_user_phone(&db, &session.user.id, phone)?;
    }
    let user = queries::get_user(&db, &session.user.id)?
        .ok_or_else(|| AppError::NotFound("user".to_string()))?;
    Ok(Json(user))
}
