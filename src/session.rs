//! Bearer-token extractors that resolve the caller before a handler runs.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{SessionRole, User};
use crate::state::AppState;

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// A signed-in customer.
pub struct CustomerSession {
    pub token: String,
    pub user: User,
}

/// A signed-in staff member.
pub struct AdminSession {
    pub token: String,
    pub username: String,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CustomerSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AppError::Unauthorized)?;

        let db = state.db()?;
        let session = queries::get_session(&db, token)?
            .filter(|s| s.role == SessionRole::Customer)
            .ok_or(AppError::Unauthorized)?;
        let user = queries::get_user(&db, &session.subject)?.ok_or(AppError::Unauthorized)?;

        Ok(CustomerSession {
            token: session.token,
            user,
        })
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AppError::Unauthorized)?;

        let db = state.db()?;
        let session = queries::get_session(&db, token)?
            .filter(|s| s.role == SessionRole::Admin)
            .ok_or(AppError::Unauthorized)?;

        Ok(AdminSession {
            token: session.token,
            username: session.subject,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert("authorization", "Bearer abc123".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc123"));

        headers.insert("authorization", "Basic abc123".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);

        headers.insert("authorization", "Bearer ".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }
}
