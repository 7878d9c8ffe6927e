//! Business units.

use tracing::instrument;

use super::{BusinessUnit, BusinessUnitDraft, CommercetoolsClient, CommercetoolsError};

impl CommercetoolsClient {
    /// Create a business unit.
    ///
    /// # Errors
    ///
    /// Returns `CommercetoolsError::Duplicate` if the key is taken, or an API
    /// error if a referenced associate role, customer or store does not exist.
    #[instrument(skip(self, draft), fields(key = %draft.key))]
    pub async fn create_business_unit(
        &self,
        draft: &BusinessUnitDraft,
    ) -> Result<BusinessUnit, CommercetoolsError> {
        let unit: BusinessUnit = self.post("/business-units", draft).await?;
        tracing::info!(business_unit_id = %unit.id, "Created business unit");
        Ok(unit)
    }
}
