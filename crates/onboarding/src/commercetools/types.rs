//! commercetools HTTP API types.
//!
//! Drafts are what we send, resources are what comes back. Field names follow
//! the API's camelCase JSON. Only the fields onboarding reads are modelled on
//! the resource side; unknown fields are ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use sellertools_core::{
    BusinessUnitId, ChannelId, ChannelRole, CustomerId, ProductSelectionId, StoreId,
};

/// Locale used for all names and descriptions we create.
pub const DEFAULT_LOCALE: &str = "en-US";

/// Localized text, keyed by locale (`{"en-US": "Acme Co Store"}`).
pub type LocalizedString = BTreeMap<String, String>;

/// Build a single-locale [`LocalizedString`].
#[must_use]
pub fn localized(locale: &str, value: impl Into<String>) -> LocalizedString {
    BTreeMap::from([(locale.to_string(), value.into())])
}

// =============================================================================
// References
// =============================================================================

/// Resource type discriminator used in references and identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceTypeId {
    Customer,
    CustomerGroup,
    Channel,
    Store,
    ProductSelection,
    AssociateRole,
    BusinessUnit,
}

/// Points at an existing resource by ID or by key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceIdentifier {
    pub type_id: ReferenceTypeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl ResourceIdentifier {
    /// Identify a resource by its ID.
    #[must_use]
    pub fn by_id(type_id: ReferenceTypeId, id: impl Into<String>) -> Self {
        Self {
            type_id,
            id: Some(id.into()),
            key: None,
        }
    }

    /// Identify a resource by its user-defined key.
    #[must_use]
    pub fn by_key(type_id: ReferenceTypeId, key: impl Into<String>) -> Self {
        Self {
            type_id,
            id: None,
            key: Some(key.into()),
        }
    }
}

/// Reference returned inside a resource.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    pub type_id: ReferenceTypeId,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
}

// =============================================================================
// Customers
// =============================================================================

/// How the customer signs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthenticationMode {
    Password,
    ExternalAuth,
}

/// Draft for `POST /{projectKey}/customers`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
    pub authentication_mode: AuthenticationMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_group: Option<ResourceIdentifier>,
}

/// Customer resource.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub version: i64,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub is_email_verified: bool,
    #[serde(default)]
    pub customer_group: Option<Reference>,
}

/// Response of customer creation.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerSignInResult {
    pub customer: Customer,
}

/// Body of `POST /{projectKey}/customers/email-token`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCreateEmailToken {
    pub id: CustomerId,
    pub ttl_minutes: u32,
}

/// Email verification token issued for a customer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerToken {
    pub id: String,
    pub customer_id: CustomerId,
    /// Token value; empty when the platform did not issue one.
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub expires_at: Option<String>,
}

/// Body of `POST /{projectKey}/customers/email/confirm`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerEmailVerify {
    pub token_value: String,
}

// =============================================================================
// Channels and stores
// =============================================================================

/// Draft for `POST /{projectKey}/channels`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelDraft {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<LocalizedString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<LocalizedString>,
    pub roles: Vec<ChannelRole>,
}

/// Channel resource.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: ChannelId,
    pub version: i64,
    pub key: String,
    #[serde(default)]
    pub roles: Vec<ChannelRole>,
    #[serde(default)]
    pub name: Option<LocalizedString>,
}

/// Draft for `POST /{projectKey}/stores`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreDraft {
    pub key: String,
    pub name: LocalizedString,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub distribution_channels: Vec<ResourceIdentifier>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub supply_channels: Vec<ResourceIdentifier>,
}

/// Store resource.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: StoreId,
    pub version: i64,
    pub key: String,
    #[serde(default)]
    pub name: Option<LocalizedString>,
    #[serde(default)]
    pub distribution_channels: Vec<Reference>,
    #[serde(default)]
    pub supply_channels: Vec<Reference>,
}

/// Body of `POST /{projectKey}/stores/key={key}`.
#[derive(Debug, Clone, Serialize)]
pub struct StoreUpdate {
    pub version: i64,
    pub actions: Vec<StoreUpdateAction>,
}

/// Store update actions used by onboarding.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum StoreUpdateAction {
    AddProductSelection {
        #[serde(rename = "productSelection")]
        product_selection: ResourceIdentifier,
        active: bool,
    },
}

// =============================================================================
// Product selections
// =============================================================================

/// Whether listed products are included or excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductSelectionMode {
    Individual,
    IndividualExclusion,
}

/// Draft for `POST /{projectKey}/product-selections`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSelectionDraft {
    pub key: String,
    pub name: LocalizedString,
    pub mode: ProductSelectionMode,
}

/// Product selection resource.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSelection {
    pub id: ProductSelectionId,
    pub version: i64,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub name: Option<LocalizedString>,
    #[serde(default)]
    pub mode: Option<ProductSelectionMode>,
}

// =============================================================================
// Business units
// =============================================================================

/// Business unit type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BusinessUnitType {
    Company,
    Division,
}

/// How a business unit's stores are determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BusinessUnitStoreMode {
    Explicit,
    FromParent,
}

/// Postal address attached to a business unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseAddress {
    pub key: String,
    pub country: String,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub phone: String,
}

/// Role assignment of an associate.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociateRoleAssignmentDraft {
    pub associate_role: ResourceIdentifier,
}

/// Customer acting on behalf of a business unit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociateDraft {
    pub customer: ResourceIdentifier,
    pub associate_role_assignments: Vec<AssociateRoleAssignmentDraft>,
}

/// Draft for `POST /{projectKey}/business-units`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessUnitDraft {
    pub key: String,
    pub name: String,
    pub unit_type: BusinessUnitType,
    pub contact_email: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<BaseAddress>,
    pub associates: Vec<AssociateDraft>,
    pub stores: Vec<ResourceIdentifier>,
    pub store_mode: BusinessUnitStoreMode,
}

/// Business unit resource.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessUnit {
    pub id: BusinessUnitId,
    pub version: i64,
    pub key: String,
    pub name: String,
    pub unit_type: BusinessUnitType,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub store_mode: Option<BusinessUnitStoreMode>,
}

// =============================================================================
// Custom objects
// =============================================================================

/// Draft for `POST /{projectKey}/custom-objects` (create or replace).
#[derive(Debug, Clone, Serialize)]
pub struct CustomObjectDraft {
    pub container: String,
    pub key: String,
    pub value: serde_json::Value,
}

/// Custom object resource.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomObject {
    pub id: String,
    pub version: i64,
    pub container: String,
    pub key: String,
    pub value: serde_json::Value,
}

// =============================================================================
// Errors
// =============================================================================

/// Error body returned by the HTTP API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    #[serde(default)]
    pub status_code: Option<u16>,
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ErrorObject>,
}

/// One entry of [`ErrorResponse::errors`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorObject {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub field: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_draft_omits_missing_group() {
        let draft = CustomerDraft {
            email: "ada@acme.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            company_name: "Acme Co".to_string(),
            authentication_mode: AuthenticationMode::ExternalAuth,
            customer_group: None,
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["authenticationMode"], "ExternalAuth");
        assert!(json.get("customerGroup").is_none());
    }

    #[test]
    fn test_resource_identifier_by_key() {
        let json = serde_json::to_value(ResourceIdentifier::by_key(
            ReferenceTypeId::CustomerGroup,
            "sellers",
        ))
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"typeId": "customer-group", "key": "sellers"})
        );
    }

    #[test]
    fn test_store_update_action_shape() {
        let update = StoreUpdate {
            version: 1,
            actions: vec![StoreUpdateAction::AddProductSelection {
                product_selection: ResourceIdentifier::by_id(
                    ReferenceTypeId::ProductSelection,
                    "ps-1",
                ),
                active: true,
            }],
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "version": 1,
                "actions": [{
                    "action": "addProductSelection",
                    "productSelection": {"typeId": "product-selection", "id": "ps-1"},
                    "active": true
                }]
            })
        );
    }

    #[test]
    fn test_customer_verified_defaults_false() {
        let customer: Customer =
            serde_json::from_str(r#"{"id":"c-1","version":1,"email":"ada@acme.com"}"#).unwrap();
        assert!(!customer.is_email_verified);
        assert_eq!(customer.id.as_str(), "c-1");
    }

    #[test]
    fn test_error_response_parse() {
        let body = r#"{
            "statusCode": 400,
            "message": "A duplicate value '\"acme-co-store\"' exists for field 'key'.",
            "errors": [{
                "code": "DuplicateField",
                "message": "dup",
                "field": "key",
                "duplicateValue": "acme-co-store"
            }]
        }"#;
        let error: ErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(error.status_code, Some(400));
        assert_eq!(error.errors[0].code, "DuplicateField");
        assert_eq!(error.errors[0].field.as_deref(), Some("key"));
    }
}
