pub mod brevo;
pub mod log;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::Booking;

/// Fields the confirmation email cannot go out without.
pub const REQUIRED_FIELDS: [&str; 8] = [
    "userEmail",
    "userName",
    "screenTitle",
    "date",
    "slot",
    "location",
    "package",
    "price",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmation {
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub screen_title: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub slot: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub package: String,
    #[serde(default, deserialize_with = "price_from_number_or_text")]
    pub price: Option<i64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NotificationReceipt {
    pub message_id: String,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum NotifyError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("{0}")]
    Delivery(String),
}

impl BookingConfirmation {
    pub fn from_booking(booking: &Booking) -> Self {
        Self {
            user_email: booking.user_email.clone(),
            user_name: booking.user_name.clone(),
            screen_title: booking.screen_title.clone(),
            date: booking.date.format("%Y-%m-%d").to_string(),
            slot: booking.slot.as_str().to_string(),
            location: booking.location.clone(),
            package: booking.package.as_str().to_string(),
            price: Some(booking.price),
        }
    }

    pub fn validate(&self) -> Result<(), NotifyError> {
        let text_fields = [
            &self.user_email,
            &self.user_name,
            &self.screen_title,
            &self.date,
            &self.slot,
            &self.location,
            &self.package,
        ];
        let missing_text = text_fields.iter().any(|f| f.trim().is_empty());
        let missing_price = !matches!(self.price, Some(p) if p != 0);

        if missing_text || missing_price {
            return Err(NotifyError::MissingFields);
        }
        Ok(())
    }

    pub fn subject(&self) -> String {
        format!("Booking Confirmation - {}", self.screen_title)
    }

    /// "Saturday, June 15, 2024" when the date parses, the raw text otherwise.
    pub fn display_date(&self) -> String {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map(|d| d.format("%A, %B %-d, %Y").to_string())
            .unwrap_or_else(|_| self.date.clone())
    }

    pub fn display_package(&self) -> String {
        let mut chars = self.package.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    }

    pub fn html_body(&self) -> String {
        let rows = [
            ("Experience", self.screen_title.clone()),
            ("Location", self.location.clone()),
            ("Date", self.display_date()),
            ("Time", self.slot.clone()),
            ("Package", self.display_package()),
            ("Total Amount", format!("₹{}", self.price.unwrap_or_default())),
        ];
        let details: String = rows
            .iter()
            .map(|(label, value)| {
                format!(
                    "<tr><td><strong>{label}:</strong></td><td>{}</td></tr>",
                    escape(value)
                )
            })
            .collect();

        format!(
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Booking Confirmation</title></head>\
             <body><h1>Booking Confirmed!</h1>\
             <p>Dear <strong>{name}</strong>,</p>\
             <p>Your private screening is all set. Here are your booking details:</p>\
             <table>{details}</table>\
             <p>Please arrive 15 minutes before your scheduled time.</p>\
             </body></html>",
            name = escape(&self.user_name),
        )
    }
}

/// Every value in the email body comes from a request, so none of it may carry markup.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn price_from_number_or_text<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_i64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_booking_confirmation(
        &self,
        confirmation: &BookingConfirmation,
    ) -> Result<NotificationReceipt, NotifyError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> BookingConfirmation {
        BookingConfirmation {
            user_email: "asha@example.com".to_string(),
            user_name: "Asha".to_string(),
            screen_title: "Fly High".to_string(),
            date: "2024-06-15".to_string(),
            slot: "7:00 PM".to_string(),
            location: "Dahisar".to_string(),
            package: "gold".to_string(),
            price: Some(3950),
        }
    }

    #[test]
    fn test_complete_payload_validates() {
        assert!(complete().validate().is_ok());
    }

    #[test]
    fn test_any_missing_field_rejected() {
        let mut c = complete();
        c.location = "  ".to_string();
        assert_eq!(c.validate(), Err(NotifyError::MissingFields));

        let mut c = complete();
        c.price = None;
        assert_eq!(c.validate(), Err(NotifyError::MissingFields));

        let mut c = complete();
        c.price = Some(0);
        assert_eq!(c.validate(), Err(NotifyError::MissingFields));
    }

    #[test]
    fn test_price_accepts_text() {
        let json = r#"{"userEmail":"a@b.c","userName":"A","screenTitle":"T","date":"2024-06-15",
            "slot":"10:00 AM","location":"Wadala","package":"gold","price":"1999"}"#;
        let c: BookingConfirmation = serde_json::from_str(json).unwrap();
        assert_eq!(c.price, Some(1999));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_missing_keys_deserialize_as_empty() {
        let c: BookingConfirmation = serde_json::from_str(r#"{"userEmail":"a@b.c"}"#).unwrap();
        assert_eq!(c.user_name, "");
        assert_eq!(c.price, None);
        assert_eq!(c.validate(), Err(NotifyError::MissingFields));
    }

    #[test]
    fn test_rendering() {
        let c = complete();
        assert_eq!(c.subject(), "Booking Confirmation - Fly High");
        assert_eq!(c.display_date(), "Saturday, June 15, 2024");
        assert_eq!(c.display_package(), "Gold");
        let html = c.html_body();
        assert!(html.contains("Dear <strong>Asha</strong>"));
        assert!(html.contains("₹3950"));
        assert!(html.contains("7:00 PM"));
    }

    #[test]
    fn test_markup_in_fields_is_escaped() {
        let mut c = complete();
        c.user_name = r#"<a href="https://evil.example">click</a>"#.to_string();
        c.screen_title = "Tom & Jerry".to_string();
        c.date = "<script>".to_string();

        let html = c.html_body();
        assert!(!html.contains("<a href"));
        assert!(html.contains("&lt;a href=&quot;https://evil.example&quot;&gt;click&lt;/a&gt;"));
        assert!(html.contains("Tom &amp; Jerry"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }
}
