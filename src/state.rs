use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{NaiveDate, Utc};
use rusqlite::Connection;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::services::auth::CredentialService;
use crate::services::notify::Notifier;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub notifier: Box<dyn Notifier>,
    pub credentials: Box<dyn CredentialService>,
}

impl AppState {
    /// Never hold the guard across an `.await`.
    pub fn db(&self) -> Result<MutexGuard<'_, Connection>, AppError> {
        self.db
            .lock()
            .map_err(|_| AppError::Internal(anyhow::anyhow!("database lock poisoned")))
    }

    /// Current calendar day at the venue.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.config.venue_tz).date_naive()
    }
}
