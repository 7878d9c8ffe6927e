//! Merchant Center GraphQL transport.

use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::instrument;

use super::{GraphQLError, GraphQLErrorLocation, MerchantCenterError};
use crate::config::MerchantCenterConfig;

/// Backend service a GraphQL query is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphQLTarget {
    /// Projects, organizations and teams.
    Administration,
    /// Merchant Center backend (invitations).
    MerchantCenter,
}

impl GraphQLTarget {
    /// Value of the `X-Graphql-Target` header.
    #[must_use]
    pub const fn header_value(self) -> &'static str {
        match self {
            Self::Administration => "administration",
            Self::MerchantCenter => "mc",
        }
    }
}

/// Merchant Center GraphQL API client.
#[derive(Clone)]
pub struct MerchantCenterClient {
    inner: Arc<MerchantCenterClientInner>,
}

struct MerchantCenterClientInner {
    client: reqwest::Client,
    endpoint: String,
    project_key: String,
    access_token: Option<SecretString>,
}

/// GraphQL response wrapper.
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLErrorResponse>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorResponse {
    message: String,
    #[serde(default)]
    locations: Vec<GraphQLErrorLocationResponse>,
    #[serde(default)]
    path: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorLocationResponse {
    line: i64,
    column: i64,
}

impl MerchantCenterClient {
    /// Create a new Merchant Center client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(
        config: &MerchantCenterConfig,
        timeout: Duration,
    ) -> Result<Self, MerchantCenterError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let endpoint = format!("{}/graphql", config.api_url.as_str().trim_end_matches('/'));

        Ok(Self {
            inner: Arc::new(MerchantCenterClientInner {
                client,
                endpoint,
                project_key: config.project_key.clone(),
                access_token: config.access_token.clone(),
            }),
        })
    }

    /// Project the client acts on behalf of.
    #[must_use]
    pub fn project_key(&self) -> &str {
        &self.inner.project_key
    }

    /// Whether an access token is configured.
    #[must_use]
    pub fn has_access_token(&self) -> bool {
        self.inner.access_token.is_some()
    }

    /// Execute a GraphQL query against the given target.
    ///
    /// # Errors
    ///
    /// Returns `MerchantCenterError::NoAccessToken` if no token is configured.
    /// Returns `MerchantCenterError::Unauthorized` if the token is rejected.
    /// Returns `MerchantCenterError::GraphQL` if the query returns errors.
    /// Returns `MerchantCenterError::Http` on network failures.
    #[instrument(skip(self, query, variables), fields(target = target.header_value()))]
    pub async fn execute<T: DeserializeOwned>(
        &self,
        target: GraphQLTarget,
        query: &str,
        variables: Option<serde_json::Value>,
    ) -> Result<T, MerchantCenterError> {
        let access_token = self
            .inner
            .access_token
            .as_ref()
            .ok_or(MerchantCenterError::NoAccessToken)?;

        let body = serde_json::json!({
            "query": query,
            "variables": variables.unwrap_or(serde_json::Value::Null)
        });

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .bearer_auth(access_token.expose_secret())
            .header("X-Graphql-Target", target.header_value())
            .header("X-Project-Key", &self.inner.project_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(MerchantCenterError::RateLimited(retry_after));
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(MerchantCenterError::Unauthorized);
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(MerchantCenterError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let graphql_response: GraphQLResponse<T> = response
            .json()
            .await
            .map_err(|e| MerchantCenterError::Parse(format!("Failed to parse response: {e}")))?;

        if let Some(errors) = graphql_response.errors
            && !errors.is_empty()
        {
            let converted_errors: Vec<GraphQLError> = errors
                .into_iter()
                .map(|e| GraphQLError {
                    message: e.message,
                    locations: e
                        .locations
                        .into_iter()
                        .map(|l| GraphQLErrorLocation {
                            line: l.line,
                            column: l.column,
                        })
                        .collect(),
                    path: e.path,
                })
                .collect();
            return Err(MerchantCenterError::GraphQL(converted_errors));
        }

        graphql_response.data.ok_or_else(|| {
            MerchantCenterError::GraphQL(vec![GraphQLError {
                message: "No data in response".to_string(),
                locations: vec![],
                path: vec![],
            }])
        })
    }
}

impl std::fmt::Debug for MerchantCenterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MerchantCenterClient")
            .field("endpoint", &self.inner.endpoint)
            .field("project_key", &self.inner.project_key)
            .field(
                "access_token",
                &self.inner.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}
