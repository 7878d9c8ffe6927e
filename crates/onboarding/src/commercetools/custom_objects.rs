//! Custom objects (container/key JSON documents).

use serde::Serialize;
use tracing::instrument;

use super::{CommercetoolsClient, CommercetoolsError, CustomObject, CustomObjectDraft};

impl CommercetoolsClient {
    /// Fetch a custom object, returning `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails for any reason other than 404.
    #[instrument(skip(self))]
    pub async fn get_custom_object(
        &self,
        container: &str,
        key: &str,
    ) -> Result<Option<CustomObject>, CommercetoolsError> {
        let path = format!(
            "/custom-objects/{}/{}",
            urlencoding::encode(container),
            urlencoding::encode(key)
        );

        match self.get(&path).await {
            Ok(object) => Ok(Some(object)),
            Err(CommercetoolsError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create or replace a custom object.
    ///
    /// # Errors
    ///
    /// Returns error if the value cannot be serialized or the request fails.
    #[instrument(skip(self, value))]
    pub async fn upsert_custom_object<V: Serialize + Sync>(
        &self,
        container: &str,
        key: &str,
        value: &V,
    ) -> Result<CustomObject, CommercetoolsError> {
        let draft = CustomObjectDraft {
            container: container.to_string(),
            key: key.to_string(),
            value: serde_json::to_value(value)
                .map_err(|e| CommercetoolsError::Parse(format!("Failed to encode value: {e}")))?,
        };
        self.post("/custom-objects", &draft).await
    }
}
