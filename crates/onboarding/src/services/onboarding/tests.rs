use std::sync::Mutex;

use sellertools_core::{ChannelId, NotificationKind, OnboardingForm, StoreId};

use super::*;
use crate::commercetools::{BusinessUnitType, Reference, ReferenceTypeId, ResourceIdentifier};
use crate::services::notifications::CollectingNotifier;

/// In-memory platform that records calls and echoes drafts back.
#[derive(Default)]
struct FakePlatform {
    calls: Mutex<Vec<&'static str>>,
    customer_drafts: Mutex<Vec<CustomerDraft>>,
    store_drafts: Mutex<Vec<StoreDraft>>,
    business_unit_drafts: Mutex<Vec<BusinessUnitDraft>>,
    /// Keys that already exist remotely.
    existing_keys: Mutex<Vec<String>>,
    empty_token: bool,
    unverified: bool,
}

impl FakePlatform {
    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn call(&self, name: &'static str) {
        self.calls.lock().unwrap().push(name);
    }

    /// Fails like the API does when a key is reused.
    fn claim_key(&self, key: &str) -> Result<(), CommercetoolsError> {
        let mut existing = self.existing_keys.lock().unwrap();
        if existing.iter().any(|k| k == key) {
            return Err(CommercetoolsError::Duplicate {
                field: Some("key".to_string()),
                message: format!("A duplicate value '\"{key}\"' exists for field 'key'."),
            });
        }
        existing.push(key.to_string());
        Ok(())
    }

    fn customer(id: &str, verified: bool) -> Customer {
        Customer {
            id: CustomerId::new(id),
            version: 1,
            email: "ada@acme.com".to_string(),
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            company_name: Some("Acme Co".to_string()),
            is_email_verified: verified,
            customer_group: None,
        }
    }
}

impl CommercePlatform for FakePlatform {
    async fn create_customer(&self, draft: &CustomerDraft) -> Result<Customer, CommercetoolsError> {
        self.call("create_customer");
        self.claim_key(&draft.email)?;
        self.customer_drafts.lock().unwrap().push(draft.clone());
        Ok(Self::customer("cust-1", false))
    }

    async fn create_email_token(
        &self,
        customer_id: &CustomerId,
        _ttl_minutes: u32,
    ) -> Result<CustomerToken, CommercetoolsError> {
        self.call("create_email_token");
        Ok(CustomerToken {
            id: "token-1".to_string(),
            customer_id: customer_id.clone(),
            value: if self.empty_token {
                String::new()
            } else {
                "token-value".to_string()
            },
            expires_at: None,
        })
    }

    async fn confirm_email(&self, _token_value: &str) -> Result<Customer, CommercetoolsError> {
        self.call("confirm_email");
        Ok(Self::customer("cust-1", !self.unverified))
    }

    async fn create_channel(&self, draft: &ChannelDraft) -> Result<Channel, CommercetoolsError> {
        self.call("create_channel");
        self.claim_key(&draft.key)?;
        Ok(Channel {
            id: ChannelId::new("ch-1"),
            version: 1,
            key: draft.key.clone(),
            roles: draft.roles.clone(),
            name: draft.name.clone(),
        })
    }

    async fn create_store(&self, draft: &StoreDraft) -> Result<Store, CommercetoolsError> {
        self.call("create_store");
        self.claim_key(&draft.key)?;
        self.store_drafts.lock().unwrap().push(draft.clone());
        Ok(Store {
            id: StoreId::new("st-1"),
            version: 1,
            key: draft.key.clone(),
            name: Some(draft.name.clone()),
            distribution_channels: Vec::new(),
            supply_channels: Vec::new(),
        })
    }

    async fn create_product_selection(
        &self,
        draft: &ProductSelectionDraft,
    ) -> Result<ProductSelection, CommercetoolsError> {
        self.call("create_product_selection");
        self.claim_key(&draft.key)?;
        Ok(ProductSelection {
            id: ProductSelectionId::new("ps-1"),
            version: 1,
            key: Some(draft.key.clone()),
            name: Some(draft.name.clone()),
            mode: Some(draft.mode),
        })
    }

    async fn add_product_selection_to_store(
        &self,
        store_key: &str,
        version: i64,
        selection_id: &ProductSelectionId,
        active: bool,
    ) -> Result<Store, CommercetoolsError> {
        self.call("add_product_selection_to_store");
        assert_eq!(version, 1);
        assert_eq!(selection_id.as_str(), "ps-1");
        assert!(active);
        Ok(Store {
            id: StoreId::new("st-1"),
            version: 2,
            key: store_key.to_string(),
            name: None,
            distribution_channels: vec![Reference {
                type_id: ReferenceTypeId::Channel,
                id: Some("ch-1".to_string()),
                key: None,
            }],
            supply_channels: Vec::new(),
        })
    }

    async fn create_business_unit(
        &self,
        draft: &BusinessUnitDraft,
    ) -> Result<BusinessUnit, CommercetoolsError> {
        self.call("create_business_unit");
        self.claim_key(&draft.key)?;
        self.business_unit_drafts
            .lock()
            .unwrap()
            .push(draft.clone());
        Ok(BusinessUnit {
            id: sellertools_core::BusinessUnitId::new("bu-1"),
            version: 1,
            key: draft.key.clone(),
            name: draft.name.clone(),
            unit_type: BusinessUnitType::Company,
            contact_email: Some(draft.contact_email.clone()),
            store_mode: Some(draft.store_mode),
        })
    }
}

#[derive(Default)]
struct FakeInvitations {
    fail: bool,
    invited: Mutex<Vec<String>>,
}

impl InvitationSender for FakeInvitations {
    async fn invite(
        &self,
        email: &str,
        team_name: Option<&str>,
    ) -> Result<InvitationReceipt, InvitationError> {
        self.invited.lock().unwrap().push(email.to_string());
        if self.fail {
            return Err(InvitationError::TeamNotFound(
                team_name.unwrap_or_default().to_string(),
            ));
        }
        Ok(InvitationReceipt {
            status: "Pending".to_string(),
            email: email.to_string(),
        })
    }
}

type TestOnboarder = Onboarder<FakePlatform, FakeInvitations, CollectingNotifier>;

fn settings() -> OnboardingSettings {
    OnboardingSettings {
        customer_group: Some("sellers".to_string()),
        associate_role: Some("admin".to_string()),
        team_name: Some("Sellers".to_string()),
        ..OnboardingSettings::default()
    }
}

fn onboarder_with(
    platform: FakePlatform,
    invitations: FakeInvitations,
    settings: OnboardingSettings,
) -> TestOnboarder {
    Onboarder::new(platform, invitations, CollectingNotifier::new(), settings)
}

fn onboarder() -> TestOnboarder {
    onboarder_with(
        FakePlatform::default(),
        FakeInvitations::default(),
        settings(),
    )
}

fn form() -> OnboardingForm {
    OnboardingForm {
        company_name: "Acme Co".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@acme.com".to_string(),
        phone_number: "+1 555 0100".to_string(),
    }
}

fn texts(onboarder: &TestOnboarder) -> Vec<(NotificationKind, String)> {
    onboarder
        .notifier()
        .notifications()
        .into_iter()
        .map(|n| (n.kind, n.text))
        .collect()
}

#[tokio::test]
async fn test_seller_happy_path() {
    let onboarder = onboarder();

    let summary = onboarder
        .submit(OnboardingFlow::Seller, &form())
        .await
        .unwrap();

    assert_eq!(
        onboarder.platform().calls(),
        vec![
            "create_customer",
            "create_email_token",
            "confirm_email",
            "create_channel",
            "create_store",
            "create_product_selection",
            "add_product_selection_to_store",
            "create_business_unit",
        ]
    );
    assert_eq!(summary.company_key.as_str(), "acme-co");
    assert_eq!(
        summary.product_selection_id,
        Some(ProductSelectionId::new("ps-1"))
    );
    assert!(matches!(
        summary.invitation,
        InvitationOutcome::Sent(ref r) if r.email == "ada@acme.com"
    ));
    assert_eq!(summary.trail.entries().len(), 8);

    let keys: Vec<_> = summary
        .trail
        .entries()
        .iter()
        .filter_map(|e| e.key.clone())
        .collect();
    assert_eq!(
        keys,
        vec![
            "acme-co-channel",
            "acme-co-store",
            "acme-co-selection",
            "acme-co-store",
            "acme-co"
        ]
    );

    assert_eq!(
        texts(&onboarder),
        vec![
            (
                NotificationKind::Success,
                "Merchant Center invitation sent to ada@acme.com".to_string()
            ),
            (
                NotificationKind::Success,
                "Seller Ada Lovelace has been successfully onboarded!".to_string()
            ),
        ]
    );
}

#[tokio::test]
async fn test_seller_business_unit_draft() {
    let onboarder = onboarder();
    onboarder
        .submit(OnboardingFlow::Seller, &form())
        .await
        .unwrap();

    let drafts = onboarder.platform().business_unit_drafts.lock().unwrap();
    let draft = drafts.first().unwrap();
    assert_eq!(draft.key, "acme-co");
    assert_eq!(draft.name, "Acme Co");
    assert_eq!(draft.contact_email, "ada@acme.com");
    assert_eq!(draft.addresses.len(), 1);
    let store = ResourceIdentifier::by_key(ReferenceTypeId::Store, "acme-co-store");
    assert_eq!(draft.stores, vec![store]);
    let associate = draft.associates.first().unwrap();
    assert_eq!(associate.customer.id.as_deref(), Some("cust-1"));
}

#[tokio::test]
async fn test_customer_flow() {
    let onboarder = onboarder();

    let summary = onboarder
        .submit(OnboardingFlow::Customer, &form())
        .await
        .unwrap();

    let calls = onboarder.platform().calls();
    assert!(!calls.contains(&"create_product_selection"));
    assert!(!calls.contains(&"add_product_selection_to_store"));
    assert!(onboarder.invitations().invited.lock().unwrap().is_empty());
    assert_eq!(summary.invitation, InvitationOutcome::NotRequested);
    assert!(summary.product_selection_id.is_none());

    let stores = onboarder.platform().store_drafts.lock().unwrap();
    let store = stores.first().unwrap();
    assert_eq!(store.distribution_channels.len(), 1);
    assert!(store.supply_channels.is_empty());

    // Customers never get an address, even with a phone number.
    let units = onboarder.platform().business_unit_drafts.lock().unwrap();
    assert!(units.first().unwrap().addresses.is_empty());

    assert_eq!(
        texts(&onboarder),
        vec![(
            NotificationKind::Success,
            "Customer Ada Lovelace has been successfully onboarded!".to_string()
        )]
    );
}

#[tokio::test]
async fn test_invalid_email_makes_no_calls() {
    let onboarder = onboarder();
    let form = OnboardingForm {
        email: "not-an-email".to_string(),
        ..form()
    };

    let err = onboarder
        .submit(OnboardingFlow::Seller, &form)
        .await
        .unwrap_err();

    assert!(matches!(err, OnboardingError::Validation(ref e) if e.len() == 1));
    assert!(onboarder.platform().calls().is_empty());
    assert!(onboarder.notifier().notifications().is_empty());
}

#[tokio::test]
async fn test_empty_token_halts() {
    let platform = FakePlatform {
        empty_token: true,
        ..FakePlatform::default()
    };
    let onboarder = onboarder_with(platform, FakeInvitations::default(), settings());

    let err = onboarder
        .submit(OnboardingFlow::Seller, &form())
        .await
        .unwrap_err();

    assert!(matches!(err, OnboardingError::EmailVerification { .. }));
    assert_eq!(
        onboarder.platform().calls(),
        vec!["create_customer", "create_email_token"]
    );
    assert_eq!(
        err.trail().unwrap().steps(),
        vec![OnboardingStep::CreateCustomer]
    );
    assert_eq!(
        texts(&onboarder),
        vec![(
            NotificationKind::Error,
            "Failed to onboard seller. Please try again.".to_string()
        )]
    );
}

#[tokio::test]
async fn test_unverified_customer_halts() {
    let platform = FakePlatform {
        unverified: true,
        ..FakePlatform::default()
    };
    let onboarder = onboarder_with(platform, FakeInvitations::default(), settings());

    let err = onboarder
        .submit(OnboardingFlow::Customer, &form())
        .await
        .unwrap_err();

    assert!(matches!(err, OnboardingError::EmailVerification { .. }));
    assert!(!onboarder.platform().calls().contains(&"create_channel"));
}

#[tokio::test]
async fn test_missing_associate_role() {
    let settings = OnboardingSettings {
        associate_role: None,
        ..settings()
    };
    let onboarder = onboarder_with(
        FakePlatform::default(),
        FakeInvitations::default(),
        settings,
    );

    let err = onboarder
        .submit(OnboardingFlow::Seller, &form())
        .await
        .unwrap_err();

    assert!(matches!(err, OnboardingError::MissingConfig { name: "ASSOCIATE_ROLE", .. }));
    let calls = onboarder.platform().calls();
    assert!(!calls.contains(&"create_business_unit"));
    assert!(onboarder.invitations().invited.lock().unwrap().is_empty());
    // Everything up to the store stays behind.
    assert_eq!(err.trail().unwrap().entries().len(), 7);
    assert_eq!(
        texts(&onboarder),
        vec![(
            NotificationKind::Error,
            "Failed to onboard seller. Please try again.".to_string()
        )]
    );
}

#[tokio::test]
async fn test_blank_associate_role_is_missing() {
    let settings = OnboardingSettings {
        associate_role: Some("  ".to_string()),
        ..settings()
    };
    let onboarder = onboarder_with(
        FakePlatform::default(),
        FakeInvitations::default(),
        settings,
    );

    let err = onboarder
        .submit(OnboardingFlow::Customer, &form())
        .await
        .unwrap_err();

    assert!(matches!(err, OnboardingError::MissingConfig { .. }));
}

#[tokio::test]
async fn test_invitation_failure_keeps_success() {
    let invitations = FakeInvitations {
        fail: true,
        ..FakeInvitations::default()
    };
    let onboarder = onboarder_with(FakePlatform::default(), invitations, settings());

    let summary = onboarder
        .submit(OnboardingFlow::Seller, &form())
        .await
        .unwrap();

    assert!(matches!(summary.invitation, InvitationOutcome::Failed(_)));
    assert_eq!(
        texts(&onboarder),
        vec![
            (
                NotificationKind::Warning,
                "Onboarding succeeded, but the Merchant Center invitation to ada@acme.com could not be sent."
                    .to_string()
            ),
            (
                NotificationKind::Success,
                "Seller Ada Lovelace has been successfully onboarded!".to_string()
            ),
        ]
    );
}

#[tokio::test]
async fn test_resubmission_conflicts() {
    let onboarder = onboarder();
    onboarder
        .submit(OnboardingFlow::Seller, &form())
        .await
        .unwrap();

    let err = onboarder
        .submit(OnboardingFlow::Seller, &form())
        .await
        .unwrap_err();

    assert!(err.is_conflict());
    assert_eq!(err.step(), Some(OnboardingStep::CreateCustomer));
    assert_eq!(
        onboarder
            .notifier()
            .notifications()
            .last()
            .map(|n| n.text.clone()),
        Some("Failed to onboard seller. Please try again.".to_string())
    );
}

#[tokio::test]
async fn test_same_company_new_email_conflicts_on_channel() {
    let onboarder = onboarder();
    onboarder
        .submit(OnboardingFlow::Seller, &form())
        .await
        .unwrap();

    let second = OnboardingForm {
        email: "grace@acme.com".to_string(),
        ..form()
    };
    let err = onboarder
        .submit(OnboardingFlow::Seller, &second)
        .await
        .unwrap_err();

    assert!(err.is_conflict());
    assert_eq!(err.step(), Some(OnboardingStep::CreateChannel));
    assert_eq!(err.trail().unwrap().entries().len(), 3);
}

#[tokio::test]
async fn test_customer_group_omitted_when_unset() {
    let settings = OnboardingSettings {
        customer_group: None,
        ..settings()
    };
    let onboarder = onboarder_with(
        FakePlatform::default(),
        FakeInvitations::default(),
        settings,
    );
    onboarder
        .submit(OnboardingFlow::Customer, &form())
        .await
        .unwrap();

    let drafts = onboarder.platform().customer_drafts.lock().unwrap();
    assert!(drafts.first().unwrap().customer_group.is_none());
}

#[tokio::test]
async fn test_seller_without_phone_has_no_address() {
    let onboarder = onboarder();
    let form = OnboardingForm {
        phone_number: String::new(),
        ..form()
    };
    onboarder
        .submit(OnboardingFlow::Seller, &form)
        .await
        .unwrap();

    let drafts = onboarder.platform().business_unit_drafts.lock().unwrap();
    assert!(drafts.first().unwrap().addresses.is_empty());
}

#[tokio::test]
async fn test_standalone_invite_notifies() {
    let onboarder = onboarder();
    let email = Email::parse("ada@acme.com").unwrap();

    let receipt = onboarder.invite(&email).await.unwrap();

    assert_eq!(receipt.status, "Pending");
    assert_eq!(
        texts(&onboarder),
        vec![(
            NotificationKind::Success,
            "Merchant Center invitation sent to ada@acme.com".to_string()
        )]
    );
}
