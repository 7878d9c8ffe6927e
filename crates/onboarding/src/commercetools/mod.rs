//! commercetools HTTP API client.
//!
//! Provides the create-operations onboarding needs (customers, email
//! verification, channels, stores, product selections, business units) and
//! custom-object access for shared settings.
//!
//! # API Reference
//!
//! - Base URL: `{CTP_API_URL}/{projectKey}`
//! - Authentication: OAuth2 client credentials against `{CTP_AUTH_URL}/oauth/token`
//! - Errors: JSON body `{statusCode, message, errors: [{code, message}]}`

pub mod auth;
mod business_units;
mod custom_objects;
mod customers;
mod stores;
pub mod types;

pub use auth::AccessToken;
pub use types::*;

use std::sync::Arc;
use std::time::Duration;

use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::config::CommercetoolsConfig;

/// Errors that can occur when interacting with the commercetools API.
#[derive(Debug, Error)]
pub enum CommercetoolsError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Obtaining an access token failed.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Token rejected or missing scopes.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A unique field (usually `key`) already holds this value.
    #[error("Duplicate value for field {}: {message}", field.as_deref().unwrap_or("unknown"))]
    Duplicate {
        field: Option<String>,
        message: String,
    },

    /// Conflicting concurrent modification.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Any other error response.
    #[error("API error: {status} - {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// Failed to parse a response body.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl CommercetoolsError {
    /// Whether the error is a uniqueness or concurrency conflict.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Duplicate { .. } | Self::Conflict(_))
    }

    /// Classify a non-success response from its status code and body.
    #[must_use]
    pub fn from_response_body(status: u16, body: &str) -> Self {
        let parsed = serde_json::from_str::<ErrorResponse>(body).ok();
        let message = parsed
            .as_ref()
            .map_or_else(|| body.to_string(), |e| e.message.clone());
        let first = parsed.as_ref().and_then(|e| e.errors.first());

        if let Some(duplicate) = parsed
            .as_ref()
            .and_then(|e| e.errors.iter().find(|o| o.code == "DuplicateField"))
        {
            return Self::Duplicate {
                field: duplicate.field.clone(),
                message,
            };
        }

        match status {
            401 | 403 => Self::Unauthorized(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            _ => Self::Api {
                status,
                code: first.map(|o| o.code.clone()),
                message,
            },
        }
    }
}

/// commercetools API client.
///
/// Cheap to clone; the HTTP client and the cached access token are shared.
#[derive(Clone)]
pub struct CommercetoolsClient {
    inner: Arc<CommercetoolsClientInner>,
}

struct CommercetoolsClientInner {
    client: reqwest::Client,
    config: CommercetoolsConfig,
    /// In-memory token cache
    token: RwLock<Option<AccessToken>>,
}

impl CommercetoolsClient {
    /// Create a new commercetools API client.
    ///
    /// No token is requested until the first API call.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(
        config: &CommercetoolsConfig,
        timeout: Duration,
    ) -> Result<Self, CommercetoolsError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            inner: Arc::new(CommercetoolsClientInner {
                client,
                config: config.clone(),
                token: RwLock::new(None),
            }),
        })
    }

    /// Project all requests are scoped to.
    #[must_use]
    pub fn project_key(&self) -> &str {
        &self.inner.config.project_key
    }

    /// Drop the cached token so the next call fetches a fresh one.
    pub async fn clear_token(&self) {
        *self.inner.token.write().await = None;
    }

    /// Return a valid bearer token, requesting a new one when needed.
    async fn bearer_token(&self) -> Result<String, CommercetoolsError> {
        if let Some(token) = self.inner.token.read().await.as_ref()
            && !token.is_expired()
        {
            return Ok(token.access_token.expose_secret().to_string());
        }

        let token = auth::request_token(&self.inner.client, &self.inner.config).await?;
        let value = token.access_token.expose_secret().to_string();
        *self.inner.token.write().await = Some(token);
        tracing::debug!("Obtained commercetools access token");
        Ok(value)
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}{}",
            self.inner.config.api_url.as_str().trim_end_matches('/'),
            self.inner.config.project_key,
            path
        )
    }

    /// Execute a GET request against the project.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, CommercetoolsError> {
        let token = self.bearer_token().await?;
        let response = self
            .inner
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Execute a POST request against the project.
    pub(crate) async fn post<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, CommercetoolsError> {
        let token = self.bearer_token().await?;
        let response = self
            .inner
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Handle API response and parse JSON.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, CommercetoolsError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| CommercetoolsError::Parse(format!("Failed to parse response: {e}")));
        }

        Err(self.parse_error(response).await)
    }

    /// Parse error response from the API.
    async fn parse_error(&self, response: reqwest::Response) -> CommercetoolsError {
        let status = response.status().as_u16();

        if status == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return CommercetoolsError::RateLimited(retry_after);
        }

        if status == 401 {
            // The token may have been revoked; fetch a new one next time.
            self.clear_token().await;
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        CommercetoolsError::from_response_body(status, &body)
    }
}

impl std::fmt::Debug for CommercetoolsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommercetoolsClient")
            .field("project_key", &self.inner.config.project_key)
            .finish_non_exhaustive()
    }
}
