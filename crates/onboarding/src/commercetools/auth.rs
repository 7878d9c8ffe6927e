//! commercetools OAuth2 client credentials flow.
//!
//! Exchanges the API client ID and secret for a short-lived bearer token.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::instrument;

use super::CommercetoolsError;
use crate::config::CommercetoolsConfig;

/// Bearer token obtained from the auth service.
#[derive(Debug, Clone)]
pub struct AccessToken {
    /// Token sent as `Authorization: Bearer ...`.
    pub access_token: SecretString,
    /// Unix timestamp when the token expires.
    pub expires_at: i64,
    /// Scopes actually granted.
    pub scope: String,
}

/// Response from the token endpoint.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    /// Token lifetime in seconds.
    expires_in: i64,
    #[serde(default)]
    scope: String,
}

/// Error response from the token endpoint.
#[derive(Deserialize)]
struct TokenErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Request a token with the client credentials grant.
///
/// # Errors
///
/// Returns `CommercetoolsError::Authentication` if the credentials are
/// rejected, or `CommercetoolsError::Http` on network failures.
#[instrument(skip(client, config), fields(client_id = %config.client_id))]
pub async fn request_token(
    client: &reqwest::Client,
    config: &CommercetoolsConfig,
) -> Result<AccessToken, CommercetoolsError> {
    let now = chrono::Utc::now().timestamp();
    let url = format!(
        "{}/oauth/token",
        config.auth_url.as_str().trim_end_matches('/')
    );

    let response = client
        .post(&url)
        .basic_auth(
            &config.client_id,
            Some(config.client_secret.expose_secret()),
        )
        .form(&[
            ("grant_type", "client_credentials"),
            ("scope", config.scopes.as_str()),
        ])
        .send()
        .await?;

    let status = response.status();

    if status.is_success() {
        let token: TokenResponse = response.json().await?;

        return Ok(AccessToken {
            access_token: SecretString::from(token.access_token),
            expires_at: now + token.expires_in,
            scope: token.scope,
        });
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<TokenErrorResponse>(&body)
        .ok()
        .and_then(|e| e.error_description.or(e.message).or(e.error))
        .unwrap_or(body);

    Err(CommercetoolsError::Authentication(format!(
        "HTTP {status}: {message}"
    )))
}

impl AccessToken {
    /// Check if the token has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        // Consider expired if less than 60 seconds remaining
        now >= self.expires_at - 60
    }
}
