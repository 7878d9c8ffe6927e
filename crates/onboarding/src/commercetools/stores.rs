//! Channels, stores and product selections.

use tracing::instrument;

use sellertools_core::ProductSelectionId;

use super::{
    Channel, ChannelDraft, CommercetoolsClient, CommercetoolsError, ProductSelection,
    ProductSelectionDraft, ReferenceTypeId, ResourceIdentifier, Store, StoreDraft, StoreUpdate,
    StoreUpdateAction,
};

impl CommercetoolsClient {
    /// Create a channel.
    ///
    /// # Errors
    ///
    /// Returns `CommercetoolsError::Duplicate` if the key is taken.
    #[instrument(skip(self, draft), fields(key = %draft.key))]
    pub async fn create_channel(
        &self,
        draft: &ChannelDraft,
    ) -> Result<Channel, CommercetoolsError> {
        let channel: Channel = self.post("/channels", draft).await?;
        tracing::info!(channel_id = %channel.id, "Created channel");
        Ok(channel)
    }

    /// Create a store.
    ///
    /// # Errors
    ///
    /// Returns `CommercetoolsError::Duplicate` if the key is taken.
    #[instrument(skip(self, draft), fields(key = %draft.key))]
    pub async fn create_store(&self, draft: &StoreDraft) -> Result<Store, CommercetoolsError> {
        let store: Store = self.post("/stores", draft).await?;
        tracing::info!(store_id = %store.id, "Created store");
        Ok(store)
    }

    /// Create a product selection.
    ///
    /// # Errors
    ///
    /// Returns `CommercetoolsError::Duplicate` if the key is taken.
    #[instrument(skip(self, draft), fields(key = %draft.key))]
    pub async fn create_product_selection(
        &self,
        draft: &ProductSelectionDraft,
    ) -> Result<ProductSelection, CommercetoolsError> {
        let selection: ProductSelection = self.post("/product-selections", draft).await?;
        tracing::info!(product_selection_id = %selection.id, "Created product selection");
        Ok(selection)
    }

    /// Attach a product selection to a store, addressed by store key.
    ///
    /// `version` must be the store's current version.
    ///
    /// # Errors
    ///
    /// Returns `CommercetoolsError::Conflict` on a version mismatch.
    #[instrument(skip(self), fields(store_key = %store_key, product_selection_id = %selection_id))]
    pub async fn add_product_selection_to_store(
        &self,
        store_key: &str,
        version: i64,
        selection_id: &ProductSelectionId,
        active: bool,
    ) -> Result<Store, CommercetoolsError> {
        let path = format!("/stores/key={}", urlencoding::encode(store_key));
        let update = StoreUpdate {
            version,
            actions: vec![StoreUpdateAction::AddProductSelection {
                product_selection: ResourceIdentifier::by_id(
                    ReferenceTypeId::ProductSelection,
                    selection_id.as_str(),
                ),
                active,
            }],
        };
        self.post(&path, &update).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use sellertools_core::ChannelRole;

    use super::super::localized;
    use super::super::tests::{mock_token, test_client};
    use super::*;

    #[tokio::test]
    async fn test_create_channel() {
        let mut server = mockito::Server::new_async().await;
        let _token = mock_token(&mut server).await;
        let mock = server
            .mock("POST", "/demo/channels")
            .match_body(Matcher::PartialJson(json!({
                "key": "acme-co-channel",
                "roles": ["InventorySupply", "ProductDistribution"]
            })))
            .with_status(201)
            .with_body(
                json!({
                    "id": "ch-1",
                    "version": 1,
                    "key": "acme-co-channel",
                    "roles": ["InventorySupply", "ProductDistribution"]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let draft = ChannelDraft {
            key: "acme-co-channel".to_string(),
            name: Some(localized("en-US", "Acme Co")),
            description: None,
            roles: vec![
                ChannelRole::InventorySupply,
                ChannelRole::ProductDistribution,
            ],
        };
        let channel = test_client(&server).create_channel(&draft).await.unwrap();

        assert_eq!(channel.id.as_str(), "ch-1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_store_with_channels() {
        let mut server = mockito::Server::new_async().await;
        let _token = mock_token(&mut server).await;
        let mock = server
            .mock("POST", "/demo/stores")
            .match_body(Matcher::PartialJson(json!({
                "key": "acme-co-store",
                "name": {"en-US": "Acme Co"},
                "distributionChannels": [{"typeId": "channel", "id": "ch-1"}],
                "supplyChannels": [{"typeId": "channel", "id": "ch-1"}]
            })))
            .with_status(201)
            .with_body(r#"{"id":"st-1","version":1,"key":"acme-co-store"}"#)
            .create_async()
            .await;

        let channel = ResourceIdentifier::by_id(ReferenceTypeId::Channel, "ch-1");
        let draft = StoreDraft {
            key: "acme-co-store".to_string(),
            name: localized("en-US", "Acme Co"),
            distribution_channels: vec![channel.clone()],
            supply_channels: vec![channel],
        };
        let store = test_client(&server).create_store(&draft).await.unwrap();

        assert_eq!(store.version, 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_add_product_selection_to_store() {
        let mut server = mockito::Server::new_async().await;
        let _token = mock_token(&mut server).await;
        let mock = server
            .mock("POST", "/demo/stores/key=acme-co-store")
            .match_body(Matcher::Json(json!({
                "version": 1,
                "actions": [{
                    "action": "addProductSelection",
                    "productSelection": {"typeId": "product-selection", "id": "ps-1"},
                    "active": true
                }]
            })))
            .with_status(200)
            .with_body(r#"{"id":"st-1","version":2,"key":"acme-co-store"}"#)
            .create_async()
            .await;

        let store = test_client(&server)
            .add_product_selection_to_store(
                "acme-co-store",
                1,
                &ProductSelectionId::new("ps-1"),
                true,
            )
            .await
            .unwrap();

        assert_eq!(store.version, 2);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_store_version_conflict() {
        let mut server = mockito::Server::new_async().await;
        let _token = mock_token(&mut server).await;
        let _mock = server
            .mock("POST", "/demo/stores/key=acme-co-store")
            .with_status(409)
            .with_body(
                json!({
                    "statusCode": 409,
                    "message": "Object st-1 has a different version than expected.",
                    "errors": [{"code": "ConcurrentModification", "message": "different version"}]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let err = test_client(&server)
            .add_product_selection_to_store(
                "acme-co-store",
                1,
                &ProductSelectionId::new("ps-1"),
                true,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CommercetoolsError::Conflict(_)));
    }
}
