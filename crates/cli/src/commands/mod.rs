//! CLI command implementations.

pub mod invite;
pub mod onboard;
pub mod settings;

use sellertools_onboarding::commercetools::{CommercetoolsClient, CommercetoolsError};
use sellertools_onboarding::merchant_center::{MerchantCenterClient, MerchantCenterError};
use sellertools_onboarding::{AppConfig, LogNotifier, Onboarder, OnboardingSettings};

/// Onboarder wired to the real APIs, notifying through the log.
pub type CliOnboarder = Onboarder<CommercetoolsClient, MerchantCenterClient, LogNotifier>;

/// Errors building the API clients.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("commercetools client: {0}")]
    Commercetools(#[from] CommercetoolsError),

    #[error("Merchant Center client: {0}")]
    MerchantCenter(#[from] MerchantCenterError),
}

pub fn commercetools_client(config: &AppConfig) -> Result<CommercetoolsClient, SetupError> {
    Ok(CommercetoolsClient::new(&config.commercetools, config.http_timeout)?)
}

pub fn onboarder(config: &AppConfig) -> Result<CliOnboarder, SetupError> {
    let platform = commercetools_client(config)?;
    let invitations = MerchantCenterClient::new(&config.merchant_center, config.http_timeout)?;

    if !invitations.has_access_token() {
        tracing::warn!("MC_ACCESS_TOKEN is not set; Merchant Center invitations will fail");
    }

    Ok(Onboarder::new(
        platform,
        invitations,
        LogNotifier,
        OnboardingSettings::from_config(config),
    ))
}
