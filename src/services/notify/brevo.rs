use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{BookingConfirmation, NotificationReceipt, Notifier, NotifyError};

const BREVO_SEND_URL: &str = "https://api.brevo.com/v3/smtp/email";

pub struct BrevoNotifier {
    api_key: String,
    sender_name: String,
    sender_email: String,
    client: reqwest::Client,
}

impl BrevoNotifier {
    pub fn new(api_key: String, sender_name: String, sender_email: String) -> Self {
        Self {
            api_key,
            sender_name,
            sender_email,
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendResponse {
    message_id: String,
}

#[async_trait]
impl Notifier for BrevoNotifier {
    async fn send_booking_confirmation(
        &self,
        confirmation: &BookingConfirmation,
    ) -> Result<NotificationReceipt, NotifyError> {
        confirmation.validate()?;

        let body = json!({
            "sender": { "name": self.sender_name, "email": self.sender_email },
            "to": [{ "email": confirmation.user_email, "name": confirmation.user_name }],
            "subject": confirmation.subject(),
            "htmlContent": confirmation.html_body(),
        });

        let resp = self
            .client
            .post(BREVO_SEND_URL)
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| NotifyError::Delivery(format!("failed to call Brevo API: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(NotifyError::Delivery(format!(
                "Brevo API error ({status}): {detail}"
            )));
        }

        let data: SendResponse = resp
            .json()
            .await
            .map_err(|e| NotifyError::Delivery(format!("failed to parse Brevo response: {e}")))?;

        tracing::info!(to = %confirmation.user_email, message_id = %data.message_id, "confirmation email sent");

        Ok(NotificationReceipt {
            message_id: data.message_id,
        })
    }
}
