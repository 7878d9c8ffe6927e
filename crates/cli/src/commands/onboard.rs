//! Onboarding commands.
//!
//! # Batch file format
//!
//! A YAML list of onboarding forms:
//!
//! ```yaml
//! - companyName: Acme Co
//!   firstName: Ada
//!   lastName: Lovelace
//!   email: ada@acme.com
//!   phoneNumber: "+1 555 0100"
//! - companyName: Globex
//!   firstName: Hank
//!   lastName: Scorpio
//!   email: hank@globex.com
//! ```

use std::path::Path;

use thiserror::Error;
use tracing::{error, info};

use sellertools_core::{OnboardingFlow, OnboardingForm};
use sellertools_onboarding::{AppConfig, OnboardingError};

use super::onboarder;

/// Errors specific to onboarding commands.
#[derive(Debug, Error)]
pub enum OnboardCommandError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid batch file: {0}")]
    InvalidBatch(#[from] serde_yaml::Error),

    #[error("Batch file contains no requests")]
    EmptyBatch,

    #[error("{failed} of {total} onboarding requests failed")]
    BatchFailed { failed: usize, total: usize },
}

/// Onboard one seller or customer.
///
/// # Errors
///
/// Returns the onboarding error after it has been logged and notified.
pub async fn single(
    config: &AppConfig,
    flow: OnboardingFlow,
    form: &OnboardingForm,
) -> Result<(), Box<dyn std::error::Error>> {
    let onboarder = onboarder(config)?;

    match onboarder.submit(flow, form).await {
        Ok(summary) => {
            info!("{summary}");
            Ok(())
        }
        Err(e) => {
            report_validation(&e);
            Err(e.into())
        }
    }
}

/// Onboard every request in a YAML file, one after another.
///
/// A failed request does not stop the batch.
///
/// # Errors
///
/// Returns error if the file cannot be read or parsed, or if any request
/// failed.
pub async fn batch(
    config: &AppConfig,
    flow: OnboardingFlow,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(OnboardCommandError::FileNotFound(path.display().to_string()).into());
    }

    info!(path = %path.display(), "Loading onboarding requests from file");
    let content = tokio::fs::read_to_string(path).await?;
    let forms = parse_batch(&content)?;
    info!(requests = forms.len(), %flow, "Parsed batch file");

    let onboarder = onboarder(config)?;
    let mut failed = 0;

    for (index, form) in forms.iter().enumerate() {
        info!(request = index + 1, company = %form.company_name, "Onboarding");
        match onboarder.submit(flow, form).await {
            Ok(summary) => info!("{summary}"),
            Err(e) => {
                report_validation(&e);
                failed += 1;
            }
        }
    }

    info!(total = forms.len(), failed, "Batch complete");

    if failed > 0 {
        return Err(OnboardCommandError::BatchFailed {
            failed,
            total: forms.len(),
        }
        .into());
    }
    Ok(())
}

/// Parse a batch file's contents.
///
/// # Errors
///
/// Returns error if the YAML is malformed or the list is empty.
pub fn parse_batch(content: &str) -> Result<Vec<OnboardingForm>, OnboardCommandError> {
    let forms: Vec<OnboardingForm> = serde_yaml::from_str(content)?;
    if forms.is_empty() {
        return Err(OnboardCommandError::EmptyBatch);
    }
    Ok(forms)
}

/// Field errors are not notified; log one line per field.
fn report_validation(error: &OnboardingError) {
    if let OnboardingError::Validation(errors) = error {
        for (field, reason) in errors.iter() {
            error!(field = %field, "{reason}");
        }
    }
}
