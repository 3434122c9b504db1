use std::env;

use anyhow::Context;
use chrono_tz::Tz;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub admin_username: String,
    /// bcrypt hash. Empty disables staff login.
    pub admin_password_hash: String,
    pub venue_tz: Tz,
    pub firebase_api_key: String,
    pub brevo_api_key: String,
    pub email_sender_name: String,
    pub email_sender_address: String,
    pub session_ttl_hours: i64,
    pub seed_screens: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let tz_name = env::var("VENUE_TIMEZONE").unwrap_or_else(|_| "Asia/Kolkata".to_string());
        let venue_tz: Tz = tz_name
            .parse()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("VENUE_TIMEZONE '{tz_name}' is not an IANA timezone"))?;

        Ok(Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "screenbook.db".to_string()),
            admin_username: env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            admin_password_hash: env::var("ADMIN_PASSWORD_HASH").unwrap_or_default(),
            venue_tz,
            firebase_api_key: env::var("FIREBASE_API_KEY").unwrap_or_default(),
            brevo_api_key: env::var("BREVO_API_KEY").unwrap_or_default(),
            email_sender_name: env::var("EMAIL_SENDER_NAME")
                .unwrap_or_else(|_| "Digital Diaries".to_string()),
            email_sender_address: env::var("EMAIL_SENDER_ADDRESS")
                .unwrap_or_else(|_| "noreply@digitaldiaries.com".to_string()),
            session_ttl_hours: env::var("SESSION_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(72),
            seed_screens: env::var("SEED_SCREENS")
                .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no"))
                .unwrap_or(true),
        })
    }
}
