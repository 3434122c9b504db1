use async_trait::async_trait;

use super::{BookingConfirmation, NotificationReceipt, Notifier, NotifyError};

/// Writes confirmations to the log instead of sending them. Used when no
/// email API key is configured.
#[derive(Clone, Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_booking_confirmation(
        &self,
        confirmation: &BookingConfirmation,
    ) -> Result<NotificationReceipt, NotifyError> {
        confirmation.validate()?;

        let message_id = format!("log-{}", uuid::Uuid::new_v4());
        tracing::info!(
            to = %confirmation.user_email,
            subject = %confirmation.subject(),
            date = %confirmation.display_date(),
            slot = %confirmation.slot,
            message_id = %message_id,
            "confirmation email (not sent, no email provider configured)"
        );

        Ok(NotificationReceipt { message_id })
    }
}
