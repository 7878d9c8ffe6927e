//! Shared settings commands.

use tracing::info;

use sellertools_onboarding::AppConfig;
use sellertools_onboarding::services::settings::SettingsService;

use super::commercetools_client;

/// Log the current settings.
///
/// # Errors
///
/// Returns error if the API requests fail.
pub async fn show(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let settings = SettingsService::new(commercetools_client(config)?);

    let product_selection = settings.get_selected_product_selection().await?;
    let customer_group = settings.get_selected_customer_group().await?;

    info!(
        product_selection = product_selection.as_deref().unwrap_or("(not set)"),
        customer_group = customer_group.as_deref().unwrap_or("(not set)"),
        "Shared settings"
    );
    Ok(())
}

/// Store both settings.
///
/// # Errors
///
/// Returns error if either value is blank or a write fails.
pub async fn set(
    config: &AppConfig,
    product_selection: &str,
    customer_group: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if product_selection.trim().is_empty() || customer_group.trim().is_empty() {
        return Err("Both --product-selection and --customer-group must be non-empty".into());
    }

    SettingsService::new(commercetools_client(config)?)
        .set_selected_product_selection_and_customer_group(product_selection, customer_group)
        .await?;

    info!(product_selection, customer_group, "Settings saved");
    Ok(())
}
