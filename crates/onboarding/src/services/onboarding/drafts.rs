//! Resource drafts built from an onboarding request.
//!
//! Every key is derived from the company name, so the same request always
//! produces the same drafts.

use sellertools_core::{ChannelRole, CompanyKey, CustomerId, OnboardingFlow, OnboardingRequest};

use super::OnboardingSettings;
use crate::commercetools::{
    AssociateDraft, AssociateRoleAssignmentDraft, AuthenticationMode, BaseAddress,
    BusinessUnitDraft, BusinessUnitStoreMode, BusinessUnitType, ChannelDraft, CustomerDraft,
    ProductSelectionDraft, ProductSelectionMode, ReferenceTypeId, ResourceIdentifier, StoreDraft,
    localized,
};

pub fn customer_draft(request: &OnboardingRequest, settings: &OnboardingSettings) -> CustomerDraft {
    CustomerDraft {
        email: request.email().as_str().to_string(),
        first_name: request.first_name().to_string(),
        last_name: request.last_name().to_string(),
        company_name: request.company_name().to_string(),
        authentication_mode: AuthenticationMode::ExternalAuth,
        customer_group: settings
            .customer_group()
            .map(|key| ResourceIdentifier::by_key(ReferenceTypeId::CustomerGroup, key)),
    }
}

pub fn channel_draft(
    request: &OnboardingRequest,
    key: &CompanyKey,
    settings: &OnboardingSettings,
) -> ChannelDraft {
    let company = request.company_name();
    ChannelDraft {
        key: key.channel_key(),
        name: Some(localized(&settings.locale, format!("{company} Channel"))),
        description: Some(localized(
            &settings.locale,
            format!("Distribution and supply channel for {company}"),
        )),
        roles: vec![
            ChannelRole::InventorySupply,
            ChannelRole::ProductDistribution,
        ],
    }
}

/// Sellers' stores use the channel for distribution and supply; customers'
/// for distribution only.
pub fn store_draft(
    flow: OnboardingFlow,
    request: &OnboardingRequest,
    key: &CompanyKey,
    settings: &OnboardingSettings,
) -> StoreDraft {
    let channel = ResourceIdentifier::by_key(ReferenceTypeId::Channel, key.channel_key());
    let supply_channels = if flow.is_seller() {
        vec![channel.clone()]
    } else {
        Vec::new()
    };

    StoreDraft {
        key: key.store_key(),
        name: localized(
            &settings.locale,
            format!("{} Store", request.company_name()),
        ),
        distribution_channels: vec![channel],
        supply_channels,
    }
}

pub fn product_selection_draft(
    request: &OnboardingRequest,
    key: &CompanyKey,
    settings: &OnboardingSettings,
) -> ProductSelectionDraft {
    ProductSelectionDraft {
        key: key.product_selection_key(),
        name: localized(
            &settings.locale,
            format!("{} Selection", request.company_name()),
        ),
        mode: ProductSelectionMode::Individual,
    }
}

/// The customer becomes the unit's only associate, holding `associate_role`.
/// Sellers who gave a phone number get a contact address.
pub fn business_unit_draft(
    flow: OnboardingFlow,
    request: &OnboardingRequest,
    key: &CompanyKey,
    customer_id: &CustomerId,
    associate_role: &str,
    settings: &OnboardingSettings,
) -> BusinessUnitDraft {
    let addresses = match request.phone_number() {
        Some(phone) if flow.is_seller() => vec![BaseAddress {
            key: key.address_key(),
            country: settings.address_country.clone(),
            first_name: request.first_name().to_string(),
            last_name: request.last_name().to_string(),
            company: request.company_name().to_string(),
            phone: phone.as_str().to_string(),
        }],
        _ => Vec::new(),
    };

    let store = ResourceIdentifier::by_key(ReferenceTypeId::Store, key.store_key());

    BusinessUnitDraft {
        key: key.business_unit_key(),
        name: request.company_name().to_string(),
        unit_type: BusinessUnitType::Company,
        contact_email: request.email().as_str().to_string(),
        addresses,
        associates: vec![AssociateDraft {
            customer: ResourceIdentifier::by_id(ReferenceTypeId::Customer, customer_id.as_str()),
            associate_role_assignments: vec![AssociateRoleAssignmentDraft {
                associate_role: ResourceIdentifier::by_key(
                    ReferenceTypeId::AssociateRole,
                    associate_role,
                ),
            }],
        }],
        stores: vec![store],
        store_mode: BusinessUnitStoreMode::Explicit,
    }
}
