use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::models::Booking;
use crate::services::notify::{BookingConfirmation, NotifyError, REQUIRED_FIELDS};
use crate::state::AppState;

// POST /api/send-booking-confirmation
pub async fn send_booking_confirmation(
    State(state): State<Arc<AppState>>,
    Json(confirmation): Json<BookingConfirmation>,
) -> Response {
    if confirmation.validate().is_err() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": NotifyError::MissingFields.to_string(),
                "required": REQUIRED_FIELDS,
            })),
        )
            .into_response();
    }

    match state.notifier.send_booking_confirmation(&confirmation).await {
        Ok(receipt) => Json(json!({
            "success": true,
            "messageId": receipt.message_id,
            "message": "Confirmation email sent successfully",
        }))
        .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, to = %confirmation.user_email, "confirmation email failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Failed to send confirmation email",
                    "details": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}

/// Sends the confirmation email in the background. Failure is logged only.
pub(crate) fn dispatch_confirmation(state: Arc<AppState>, booking: &Booking) {
    let confirmation = BookingConfirmation::from_booking(booking);
    let booking_id = booking.id.clone();

    tokio::spawn(async move {
        match state.notifier.send_booking_confirmation(&confirmation).await {
            Ok(receipt) => tracing::info!(
                booking_id = %booking_id,
                message_id = %receipt.message_id,
                "confirmation email sent"
            ),
            Err(e) => tracing::warn!(
                booking_id = %booking_id,
                error = %e,
                "confirmation email failed"
            ),
        }
    });
}
