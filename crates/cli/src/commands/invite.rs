//! Merchant Center invitation command.
//!
//! Sends the same invitation seller onboarding ends with, useful to check
//! the Merchant Center settings (`MC_ACCESS_TOKEN`, `MC_TEAM_NAME`) before
//! onboarding anyone.

use tracing::info;

use sellertools_core::Email;
use sellertools_onboarding::AppConfig;

use super::onboarder;

/// Invite `email` to the configured Merchant Center team.
///
/// # Errors
///
/// Returns error if the email is malformed or the invitation fails.
pub async fn send(config: &AppConfig, email: &str) -> Result<(), Box<dyn std::error::Error>> {
    let email = Email::parse(email).map_err(|e| format!("Invalid email: {e}"))?;

    let receipt = onboarder(config)?.invite(&email).await?;
    info!(email = %receipt.email, status = %receipt.status, "Invitation sent");
    Ok(())
}
