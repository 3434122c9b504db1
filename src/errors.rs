use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::models::CatalogError;
use crate::services::auth::AuthError;
use crate::services::bookings::BookingError;
use crate::services::lifecycle::LifecycleError;
use crate::services::notify::NotifyError;
use crate::services::pricing::PricingError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Internal(#[from] anyhow::Error),

    #[error("{0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Conflict(String),

    #[error("upstream service error: {0}")]
    Upstream(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
        };

        let message = match &self {
            AppError::Internal(e) => {
                tracing::error!(error = ?e, "request failed");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

impl From<PricingError> for AppError {
    fn from(e: PricingError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<LifecycleError> for AppError {
    fn from(e: LifecycleError) -> Self {
        AppError::Conflict(e.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => AppError::Unauthorized,
            AuthError::EmailTaken => AppError::Conflict(e.to_string()),
            AuthError::WeakPassword => AppError::Validation(e.to_string()),
            AuthError::Provider(msg) => AppError::Upstream(msg),
        }
    }
}

impl From<NotifyError> for AppError {
    fn from(e: NotifyError) -> Self {
        match e {
            NotifyError::MissingFields => AppError::Validation(e.to_string()),
            NotifyError::Delivery(msg) => AppError::Upstream(msg),
        }
    }
}

impl From<BookingError> for AppError {
    fn from(e: BookingError) -> Self {
        match e {
            BookingError::Validation(msg) => AppError::Validation(msg),
            BookingError::ScreenNotFound(id) => AppError::NotFound(format!("screen {id}")),
            BookingError::NotFound => AppError::NotFound("booking".to_string()),
            BookingError::Pricing(e) => e.into(),
            BookingError::Lifecycle(e) => e.into(),
            BookingError::SlotUnavailable(_) | BookingError::SlotTaken | BookingError::Conflict => {
                AppError::Conflict(e.to_string())
            }
            BookingError::Store(e) => AppError::Internal(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::lifecycle::AdminAction;

    fn status_of(e: impl Into<AppError>) -> StatusCode {
        e.into().into_response().status()
    }

    #[test]
    fn test_domain_errors_map_to_status() {
        assert_eq!(status_of(PricingError::DurationRequired), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(LifecycleError::InvalidTransition {
                from: "cancelled",
                action: AdminAction::Confirm.as_str(),
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(status_of(AuthError::InvalidCredentials), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AuthError::EmailTaken), StatusCode::CONFLICT);
        assert_eq!(
            status_of(AuthError::Provider("down".to_string())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(status_of(BookingError::SlotTaken), StatusCode::CONFLICT);
        assert_eq!(status_of(BookingError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(BookingError::Pricing(PricingError::DurationNotApplicable {
                tier: "gold"
            })),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(anyhow::anyhow!("disk on fire")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
