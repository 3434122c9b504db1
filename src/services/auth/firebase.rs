use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{AuthError, CredentialService};

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Email/password accounts through the Identity Toolkit REST API.
pub struct FirebaseCredentialService {
    api_key: String,
    client: reqwest::Client,
}

impl FirebaseCredentialService {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
        }
    }

    async fn call(&self, method: &str, email: &str, password: &str) -> Result<String, AuthError> {
        if self.api_key.is_empty() {
            return Err(AuthError::Provider("FIREBASE_API_KEY is not set".to_string()));
        }

        let url = format!("{IDENTITY_TOOLKIT_URL}/accounts:{method}?key={}", self.api_key);
        let body = json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::Provider(format!("failed to call Identity Toolkit: {e}")))?;

        let status = resp.status();
        let data: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| AuthError::Provider(format!("failed to parse Identity Toolkit response: {e}")))?;

        if !status.is_success() {
            let code = data["error"]["message"].as_str().unwrap_or_default();
            return Err(map_error_code(code));
        }

        let account: AccountResponse = serde_json::from_value(data)
            .map_err(|e| AuthError::Provider(format!("missing localId in response: {e}")))?;
        Ok(account.local_id)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
}

/// Error codes can carry a suffix, e.g. "WEAK_PASSWORD : Password should be at least 6 characters".
fn map_error_code(code: &str) -> AuthError {
    let head = code.split(':').next().unwrap_or_default().trim();
    match head {
        "EMAIL_EXISTS" => AuthError::EmailTaken,
        "WEAK_PASSWORD" => AuthError::WeakPassword,
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" | "USER_DISABLED" => {
            AuthError::InvalidCredentials
        }
        other => AuthError::Provider(other.to_string()),
    }
}

#[async_trait]
impl CredentialService for FirebaseCredentialService {
    async fn register(&self, email: &str, password: &str) -> Result<String, AuthError> {
        self.call("signUp", email, password).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<String, AuthError> {
        self.call("signInWithPassword", email, password).await
    }
}
