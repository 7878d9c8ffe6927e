//! Onboarding configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CTP_PROJECT_KEY` - commercetools project key
//! - `CTP_CLIENT_ID` - API client ID (client credentials flow)
//! - `CTP_CLIENT_SECRET` - API client secret (HIGH PRIVILEGE)
//!
//! ## Optional
//! - `CTP_AUTH_URL` - OAuth host (default: <https://auth.europe-west1.gcp.commercetools.com>)
//! - `CTP_API_URL` - API host (default: <https://api.europe-west1.gcp.commercetools.com>)
//! - `CTP_SCOPES` - Space separated scopes (default: `manage_project:{CTP_PROJECT_KEY}`)
//! - `HTTP_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text
//!
//! ## Optional (onboarding)
//! - `CUSTOMER_GROUP` - Customer group key assigned to new customers
//! - `ASSOCIATE_ROLE` - Associate role key for the business unit (required
//!   once onboarding reaches the business unit step)
//!
//! ## Optional (Merchant Center - enables seller invitations)
//! - `MC_API_URL` - Merchant Center API host (default: <https://mc-api.europe-west1.gcp.commercetools.com>)
//! - `MC_ACCESS_TOKEN` - Merchant Center access token
//! - `MC_TEAM_NAME` - Team new sellers are invited into

use std::collections::HashMap;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_AUTH_URL: &str = "https://auth.europe-west1.gcp.commercetools.com";
const DEFAULT_API_URL: &str = "https://api.europe-west1.gcp.commercetools.com";
const DEFAULT_MC_API_URL: &str = "https://mc-api.europe-west1.gcp.commercetools.com";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// commercetools platform API configuration
    pub commercetools: CommercetoolsConfig,
    /// Merchant Center API configuration
    pub merchant_center: MerchantCenterConfig,
    /// Deployment-specific onboarding keys
    pub onboarding: OnboardingEnv,
    /// Timeout applied to every HTTP request
    pub http_timeout: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Log output format
    pub log_format: LogFormat,
}

/// commercetools platform API configuration.
///
/// Implements `Debug` manually to redact the client secret.
#[derive(Clone)]
pub struct CommercetoolsConfig {
    /// Project key, the first path segment of every API call
    pub project_key: String,
    /// OAuth host
    pub auth_url: Url,
    /// HTTP API host
    pub api_url: Url,
    /// API client ID
    pub client_id: String,
    /// API client secret (HIGH PRIVILEGE)
    pub client_secret: SecretString,
    /// Space separated OAuth scopes
    pub scopes: String,
}

impl std::fmt::Debug for CommercetoolsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommercetoolsConfig")
            .field("project_key", &self.project_key)
            .field("auth_url", &self.auth_url.as_str())
            .field("api_url", &self.api_url.as_str())
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// Merchant Center API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct MerchantCenterConfig {
    /// Merchant Center API host
    pub api_url: Url,
    /// Project whose owning organization receives invitations
    pub project_key: String,
    /// Access token (optional; without it invitations are skipped)
    pub access_token: Option<SecretString>,
}

impl std::fmt::Debug for MerchantCenterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MerchantCenterConfig")
            .field("api_url", &self.api_url.as_str())
            .field("project_key", &self.project_key)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Deployment-specific keys consumed by onboarding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnboardingEnv {
    /// Customer group key (`CUSTOMER_GROUP`)
    pub customer_group: Option<String>,
    /// Associate role key (`ASSOCIATE_ROLE`)
    pub associate_role: Option<String>,
    /// Merchant Center team name (`MC_TEAM_NAME`)
    pub team_name: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, URLs or
    /// numbers fail to parse, or the client secret looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let commercetools = CommercetoolsConfig::from_env()?;
        let merchant_center = MerchantCenterConfig::from_env(&commercetools.project_key)?;
        let onboarding = OnboardingEnv::from_env();
        let http_timeout = parse_http_timeout(get_optional_env("HTTP_TIMEOUT_SECS").as_deref())?;
        let log_format = match get_optional_env("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            commercetools,
            merchant_center,
            onboarding,
            http_timeout,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            log_format,
        })
    }
}

impl CommercetoolsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let project_key = get_required_env("CTP_PROJECT_KEY")?;
        let scopes = get_optional_env("CTP_SCOPES")
            .unwrap_or_else(|| format!("manage_project:{project_key}"));

        Ok(Self {
            auth_url: get_url("CTP_AUTH_URL", DEFAULT_AUTH_URL)?,
            api_url: get_url("CTP_API_URL", DEFAULT_API_URL)?,
            client_id: get_required_env("CTP_CLIENT_ID")?,
            client_secret: get_validated_secret("CTP_CLIENT_SECRET")?,
            project_key,
            scopes,
        })
    }
}

impl MerchantCenterConfig {
    fn from_env(project_key: &str) -> Result<Self, ConfigError> {
        let access_token = get_optional_env("MC_ACCESS_TOKEN").map(|token| {
            if let Err(e) = validate_secret_strength(&token, "MC_ACCESS_TOKEN") {
                tracing::warn!("MC_ACCESS_TOKEN validation warning: {e}");
            }
            SecretString::from(token)
        });

        Ok(Self {
            api_url: get_url("MC_API_URL", DEFAULT_MC_API_URL)?,
            project_key: project_key.to_string(),
            access_token,
        })
    }
}

impl OnboardingEnv {
    /// Blank values count as unset.
    fn from_env() -> Self {
        Self {
            customer_group: get_non_blank_env("CUSTOMER_GROUP"),
            associate_role: get_non_blank_env("ASSOCIATE_ROLE"),
            team_name: get_non_blank_env("MC_TEAM_NAME"),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an optional environment variable, treating blank values as unset.
fn get_non_blank_env(key: &str) -> Option<String> {
    get_optional_env(key).filter(|value| !value.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse the request timeout in seconds, defaulting when unset.
fn parse_http_timeout(value: Option<&str>) -> Result<Duration, ConfigError> {
    let Some(value) = value else {
        return Ok(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS));
    };
    value
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| ConfigError::InvalidEnvVar("HTTP_TIMEOUT_SECS".to_string(), e.to_string()))
}

/// Get a base URL, falling back to a default.
fn get_url(key: &str, default: &str) -> Result<Url, ConfigError> {
    parse_base_url(&get_env_or_default(key, default))
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e))
}

/// Parse a base URL, rejecting anything but http(s).
fn parse_base_url(value: &str) -> Result<Url, String> {
    let url = Url::parse(value).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme '{other}'")),
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the generated API client secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn commercetools_config() -> CommercetoolsConfig {
        CommercetoolsConfig {
            project_key: "sellertools-dev".to_string(),
            auth_url: Url::parse(DEFAULT_AUTH_URL).unwrap(),
            api_url: Url::parse(DEFAULT_API_URL).unwrap(),
            client_id: "client-id-123".to_string(),
            client_secret: SecretString::from("kq8Zr2VtXw9LmN4pB7cYd1FgH3jS6uE0"),
            scopes: "manage_project:sellertools-dev".to_string(),
        }
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-client-secret", "CTP_CLIENT_SECRET");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result =
            validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "CTP_CLIENT_SECRET");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_generated_secret() {
        let result =
            validate_secret_strength("kq8Zr2VtXw9LmN4pB7cYd1FgH3jS6uE0", "CTP_CLIENT_SECRET");
        assert!(result.is_ok());
    }

    #[test]
    fn test_parse_base_url() {
        assert!(parse_base_url("https://api.us-central1.gcp.commercetools.com").is_ok());
        assert!(parse_base_url("http://127.0.0.1:8080").is_ok());
        assert!(parse_base_url("ftp://example.org").is_err());
        assert!(parse_base_url("not a url").is_err());
    }

    #[test]
    fn test_commercetools_config_debug_redacts_secret() {
        let debug_output = format!("{:?}", commercetools_config());

        assert!(debug_output.contains("sellertools-dev"));
        assert!(debug_output.contains("client-id-123"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("kq8Zr2VtXw9LmN4pB7cYd1FgH3jS6uE0"));
    }

    #[test]
    fn test_merchant_center_config_debug_redacts_token() {
        let config = MerchantCenterConfig {
            api_url: Url::parse(DEFAULT_MC_API_URL).unwrap(),
            project_key: "sellertools-dev".to_string(),
            access_token: Some(SecretString::from("mc-token-value")),
        };
        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("mc-token-value"));
    }

    #[test]
    fn test_parse_http_timeout() {
        assert_eq!(parse_http_timeout(None).unwrap(), Duration::from_secs(30));
        assert_eq!(
            parse_http_timeout(Some("5")).unwrap(),
            Duration::from_secs(5)
        );
        assert!(matches!(
            parse_http_timeout(Some("soon")),
            Err(ConfigError::InvalidEnvVar(ref name, _)) if name == "HTTP_TIMEOUT_SECS"
        ));
    }
}
