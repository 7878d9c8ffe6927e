//! Merchant Center GraphQL API client.
//!
//! Used to invite a newly onboarded seller to the project's Merchant Center
//! team.
//!
//! # Architecture
//!
//! - Single `/graphql` endpoint; the `X-Graphql-Target` header routes a query
//!   to the administration service (projects, organizations, teams) or to the
//!   MC backend (invitations)
//! - Bearer token supplied through configuration (`MC_ACCESS_TOKEN`)
//! - Queries are plain strings; responses are decoded into local structs
//!
//! The integration is optional. Without a token every call fails with
//! [`MerchantCenterError::NoAccessToken`] and onboarding reports a warning.

pub mod client;
pub mod invitations;

pub use client::{GraphQLTarget, MerchantCenterClient};
pub use invitations::*;

use thiserror::Error;

/// Errors that can occur when interacting with the Merchant Center API.
#[derive(Debug, Error)]
pub enum MerchantCenterError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// Response body could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Token rejected.
    #[error("Unauthorized - Merchant Center token rejected")]
    Unauthorized,

    /// No access token configured.
    #[error("No access token - MC_ACCESS_TOKEN is not set")]
    NoAccessToken,

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Any other non-success HTTP status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
}

/// A GraphQL error returned by the Merchant Center API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    pub line: i64,
    pub column: i64,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_error_formatting() {
        let errors = vec![
            GraphQLError {
                message: "Unknown team".to_string(),
                locations: vec![GraphQLErrorLocation { line: 2, column: 5 }],
                path: vec![],
            },
            GraphQLError {
                message: "Forbidden".to_string(),
                locations: vec![],
                path: vec![serde_json::json!("invite")],
            },
        ];
        let err = MerchantCenterError::GraphQL(errors);
        assert_eq!(err.to_string(), "GraphQL errors: Unknown team; Forbidden");
    }

    #[test]
    fn test_no_access_token_error() {
        assert_eq!(
            MerchantCenterError::NoAccessToken.to_string(),
            "No access token - MC_ACCESS_TOKEN is not set"
        );
    }
}
