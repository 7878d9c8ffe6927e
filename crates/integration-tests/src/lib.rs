//! Integration tests for Sellertools.
//!
//! Runs the onboarding orchestrator with the real HTTP clients against
//! `mockito` servers standing in for the commercetools API and the Merchant
//! Center GraphQL API. No credentials or network access are needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p sellertools-integration-tests
//! ```

use std::sync::Arc;
use std::time::Duration;

use mockito::{Matcher, Mock, ServerGuard};
use secrecy::SecretString;
use serde_json::json;
use url::Url;

use sellertools_core::OnboardingForm;
use sellertools_onboarding::commercetools::CommercetoolsClient;
use sellertools_onboarding::config::{CommercetoolsConfig, MerchantCenterConfig};
use sellertools_onboarding::merchant_center::MerchantCenterClient;
use sellertools_onboarding::{CollectingNotifier, Onboarder, OnboardingSettings};

/// Project key used by every mock.
pub const PROJECT_KEY: &str = "demo";

/// Onboarder wired to mock servers, collecting notifications.
pub type TestOnboarder =
    Onboarder<CommercetoolsClient, MerchantCenterClient, Arc<CollectingNotifier>>;

/// Mock commercetools and Merchant Center servers.
pub struct TestContext {
    pub commercetools: ServerGuard,
    pub merchant_center: ServerGuard,
    pub notifier: Arc<CollectingNotifier>,
    /// Kept alive so the token endpoint stays registered.
    token: Mock,
}

impl TestContext {
    /// Start both servers and register the OAuth token endpoint.
    ///
    /// # Panics
    ///
    /// Panics if a mock server cannot start.
    pub async fn new() -> Self {
        let mut commercetools = mockito::Server::new_async().await;
        let token = commercetools
            .mock("POST", "/oauth/token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "access_token": "ct-token",
                    "expires_in": 172_800,
                    "scope": "manage_project:demo"
                })
                .to_string(),
            )
            .create_async()
            .await;

        Self {
            commercetools,
            merchant_center: mockito::Server::new_async().await,
            notifier: Arc::new(CollectingNotifier::new()),
            token,
        }
    }

    /// Verify a token was requested.
    ///
    /// # Panics
    ///
    /// Panics if the token endpoint was never called.
    pub async fn assert_token_requested(&self) {
        self.token.assert_async().await;
    }

    /// # Panics
    ///
    /// Panics if the mock server URL is not a valid URL.
    #[must_use]
    pub fn commercetools_config(&self) -> CommercetoolsConfig {
        let url = Url::parse(&self.commercetools.url()).expect("mock server URL");
        CommercetoolsConfig {
            project_key: PROJECT_KEY.to_string(),
            auth_url: url.clone(),
            api_url: url,
            client_id: "integration-client".to_string(),
            client_secret: SecretString::from("Vb7Qk2mXz9RtLw4NpC8sHd3FgJ6yUe1A"),
            scopes: format!("manage_project:{PROJECT_KEY}"),
        }
    }

    /// # Panics
    ///
    /// Panics if the mock server URL is not a valid URL.
    #[must_use]
    pub fn merchant_center_config(&self) -> MerchantCenterConfig {
        MerchantCenterConfig {
            api_url: Url::parse(&self.merchant_center.url()).expect("mock server URL"),
            project_key: PROJECT_KEY.to_string(),
            access_token: Some(SecretString::from("mc-token")),
        }
    }

    /// Build an onboarder talking to the mock servers.
    ///
    /// # Panics
    ///
    /// Panics if an HTTP client cannot be built.
    #[must_use]
    pub fn onboarder(&self, settings: OnboardingSettings) -> TestOnboarder {
        let timeout = Duration::from_secs(5);
        Onboarder::new(
            CommercetoolsClient::new(&self.commercetools_config(), timeout)
                .expect("commercetools client"),
            MerchantCenterClient::new(&self.merchant_center_config(), timeout)
                .expect("Merchant Center client"),
            Arc::clone(&self.notifier),
            settings,
        )
    }

    /// Register a `POST /demo{path}` mock answering `status` with `body`.
    pub async fn mock_post(&mut self, path: &str, status: usize, body: serde_json::Value) -> Mock {
        self.commercetools
            .mock("POST", format!("/{PROJECT_KEY}{path}").as_str())
            .match_header("authorization", "Bearer ct-token")
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await
    }

    /// Register the happy-path commercetools responses for "Acme Co".
    pub async fn mock_commercetools_success(&mut self) -> Vec<Mock> {
        vec![
            self.mock_post(
                "/customers",
                201,
                json!({"customer": {
                    "id": "cust-1",
                    "version": 1,
                    "email": "ada@acme.com",
                    "isEmailVerified": false
                }}),
            )
            .await,
            self.mock_post(
                "/customers/email-token",
                200,
                json!({"id": "tok-1", "customerId": "cust-1", "value": "verify-me"}),
            )
            .await,
            self.mock_post(
                "/customers/email/confirm",
                200,
                json!({
                    "id": "cust-1",
                    "version": 2,
                    "email": "ada@acme.com",
                    "isEmailVerified": true
                }),
            )
            .await,
            self.mock_post(
                "/channels",
                201,
                json!({
                    "id": "ch-1",
                    "version": 1,
                    "key": "acme-co-channel",
                    "roles": ["InventorySupply", "ProductDistribution"]
                }),
            )
            .await,
            self.mock_post(
                "/stores",
                201,
                json!({"id": "st-1", "version": 1, "key": "acme-co-store"}),
            )
            .await,
            self.mock_post(
                "/product-selections",
                201,
                json!({
                    "id": "ps-1",
                    "version": 1,
                    "key": "acme-co-selection",
                    "mode": "Individual"
                }),
            )
            .await,
            self.mock_post(
                "/stores/key=acme-co-store",
                200,
                json!({"id": "st-1", "version": 2, "key": "acme-co-store"}),
            )
            .await,
            self.mock_post(
                "/business-units",
                201,
                json!({
                    "id": "bu-1",
                    "version": 1,
                    "key": "acme-co",
                    "name": "Acme Co",
                    "unitType": "Company",
                    "storeMode": "Explicit"
                }),
            )
            .await,
        ]
    }

    /// Register Merchant Center responses for a successful invitation.
    pub async fn mock_invitation_success(&mut self) -> Vec<Mock> {
        vec![
            self.merchant_center
                .mock("POST", "/graphql")
                .match_header("x-graphql-target", "administration")
                .with_status(200)
                .with_body(
                    json!({"data": {"myProjects": {"results": [{
                        "key": PROJECT_KEY,
                        "owner": {
                            "id": "org-1",
                            "name": "Acme Holdings",
                            "version": 12,
                            "teams": [{"id": "team-1", "name": "Sellers"}]
                        }
                    }]}}})
                    .to_string(),
                )
                .create_async()
                .await,
            self.merchant_center
                .mock("POST", "/graphql")
                .match_header("x-graphql-target", "mc")
                .match_body(Matcher::Regex("HasValidEmail".to_string()))
                .with_status(200)
                .with_body(r#"{"data":{"invitation":{"hasValidEmail":true}}}"#)
                .create_async()
                .await,
            self.merchant_center
                .mock("POST", "/graphql")
                .match_header("x-graphql-target", "mc")
                .match_body(Matcher::Regex("mutation Invite".to_string()))
                .with_status(200)
                .with_body(r#"{"data":{"invite":{"status":"Pending","email":"ada@acme.com"}}}"#)
                .create_async()
                .await,
        ]
    }
}

/// Settings with every optional value present.
#[must_use]
pub fn full_settings() -> OnboardingSettings {
    OnboardingSettings {
        customer_group: Some("sellers".to_string()),
        associate_role: Some("admin".to_string()),
        team_name: Some("Sellers".to_string()),
        ..OnboardingSettings::default()
    }
}

/// A valid form for "Acme Co".
#[must_use]
pub fn acme_form() -> OnboardingForm {
    OnboardingForm {
        company_name: "Acme Co".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@acme.com".to_string(),
        phone_number: "+1 555 0100".to_string(),
    }
}
