pub mod firebase;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rusqlite::Connection;

use crate::db::queries;
use crate::models::{Session, SessionRole};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("an account with this email already exists")]
    EmailTaken,

    #[error("password is too weak")]
    WeakPassword,

    #[error("credential service error: {0}")]
    Provider(String),
}

/// Customer sign-up and sign-in. Returns the account's durable user id.
#[async_trait]
pub trait CredentialService: Send + Sync {
    async fn register(&self, email: &str, password: &str) -> Result<String, AuthError>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<String, AuthError>;
}

pub fn issue_session(
    conn: &Connection,
    subject: &str,
    role: SessionRole,
    ttl_hours: i64,
) -> anyhow::Result<Session> {
    let session = Session {
        token: uuid::Uuid::new_v4().simple().to_string(),
        subject: subject.to_string(),
        role,
        expires_at: Utc::now().naive_utc() + Duration::hours(ttl_hours),
    };
    queries::create_session(conn, &session)?;
    tracing::debug!(subject = %subject, role = role.as_str(), "session issued");
    Ok(session)
}

/// Checks staff credentials against the configured username and bcrypt hash.
/// An empty hash means staff login is disabled.
pub fn verify_admin(
    expected_username: &str,
    password_hash: &str,
    username: &str,
    password: &str,
) -> bool {
    if password_hash.is_empty() || username != expected_username {
        return false;
    }
    match bcrypt::verify(password, password_hash) {
        Ok(valid) => valid,
        Err(e) => {
            tracing::warn!(error = %e, "admin password hash could not be checked");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[test]
    fn test_verify_admin() {
        let hash = bcrypt::hash("s3cret-pass", 4).unwrap();
        assert!(verify_admin("admin", &hash, "admin", "s3cret-pass"));
        assert!(!verify_admin("admin", &hash, "admin", "wrong"));
        assert!(!verify_admin("admin", &hash, "root", "s3cret-pass"));
    }

    #[test]
    fn test_empty_hash_disables_admin() {
        assert!(!verify_admin("admin", "", "admin", ""));
    }

    #[test]
    fn test_malformed_hash_rejects() {
        assert!(!verify_admin("admin", "not-a-bcrypt-hash", "admin", "x"));
    }

    #[test]
    fn test_issue_session_is_retrievable() {
        let conn = db::init_db(":memory:").unwrap();
        let session = issue_session(&conn, "u-1", SessionRole::Customer, 1).unwrap();
        let loaded = queries::get_session(&conn, &session.token).unwrap().unwrap();
        assert_eq!(loaded.subject, "u-1");
        assert_eq!(loaded.role, SessionRole::Customer);
    }
}
