//! Shared Sellertools settings stored as commercetools custom objects.
//!
//! Both values are plain strings under one container, so other Sellertools
//! applications can read them too.

use tracing::instrument;

use crate::commercetools::{CommercetoolsClient, CommercetoolsError, CustomObject};

/// Custom-object container holding the shared settings.
pub const SHARED_CONTAINER: &str = "shared-sellertools-container";

/// Key of the main catalog product selection setting.
pub const PRODUCT_SELECTION_KEY: &str = "main-catalog-product-selection";

/// Key of the seller customer group setting.
pub const CUSTOMER_GROUP_KEY: &str = "seller-customer-group";

/// Reads and writes the shared settings.
#[derive(Debug, Clone)]
pub struct SettingsService {
    client: CommercetoolsClient,
}

impl SettingsService {
    #[must_use]
    pub const fn new(client: CommercetoolsClient) -> Self {
        Self { client }
    }

    /// Key of the product selection used as the main catalog.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails. A missing object is `Ok(None)`.
    pub async fn get_selected_product_selection(
        &self,
    ) -> Result<Option<String>, CommercetoolsError> {
        self.get_string(PRODUCT_SELECTION_KEY).await
    }

    /// Key of the customer group sellers belong to.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails. A missing object is `Ok(None)`.
    pub async fn get_selected_customer_group(&self) -> Result<Option<String>, CommercetoolsError> {
        self.get_string(CUSTOMER_GROUP_KEY).await
    }

    /// Store both settings, product selection first.
    ///
    /// # Errors
    ///
    /// Returns the first failed write; the product selection may already be
    /// stored when the customer group write fails.
    #[instrument(skip(self))]
    pub async fn set_selected_product_selection_and_customer_group(
        &self,
        product_selection: &str,
        customer_group: &str,
    ) -> Result<(), CommercetoolsError> {
        self.client
            .upsert_custom_object(SHARED_CONTAINER, PRODUCT_SELECTION_KEY, &product_selection)
            .await?;
        self.client
            .upsert_custom_object(SHARED_CONTAINER, CUSTOMER_GROUP_KEY, &customer_group)
            .await?;
        tracing::info!("Saved shared settings");
        Ok(())
    }

    async fn get_string(&self, key: &str) -> Result<Option<String>, CommercetoolsError> {
        let object = self.client.get_custom_object(SHARED_CONTAINER, key).await?;
        if object.is_none() {
            tracing::warn!(key, "Custom object not found");
        }
        Ok(object.and_then(string_value))
    }
}

/// Only non-empty string values count as set.
fn string_value(object: CustomObject) -> Option<String> {
    match object.value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    }
}
