//! Seller and customer onboarding.
//!
//! [`Onboarder`] runs the onboarding pipeline for one validated request:
//!
//! 1. create the customer
//! 2. issue and confirm an email verification token
//! 3. create the channel
//! 4. create the store
//! 5. (seller) create a product selection and assign it to the store
//! 6. create the business unit
//! 7. (seller) invite the customer to the Merchant Center
//!
//! Steps run strictly in order and the first failure aborts the run. Nothing
//! created before the failure is rolled back; it is listed in the error's
//! [`AuditTrail`] and logged. A failed invitation does not fail the run.

mod drafts;
mod error;
mod summary;

pub use error::OnboardingError;
pub use summary::{AuditEntry, AuditTrail, InvitationOutcome, OnboardingSummary};

use sellertools_core::{
    CustomerId, Email, OnboardingFlow, OnboardingForm, OnboardingRequest, OnboardingStep,
    ProductSelectionId,
};
use tracing::instrument;

use crate::commercetools::{
    BusinessUnit, BusinessUnitDraft, Channel, ChannelDraft, CommercetoolsClient,
    CommercetoolsError, Customer, CustomerDraft, CustomerToken, DEFAULT_LOCALE, ProductSelection,
    ProductSelectionDraft, Store, StoreDraft,
};
use crate::config::AppConfig;
use crate::merchant_center::{InvitationError, InvitationReceipt, MerchantCenterClient};
use crate::services::notifications::{Notification, Notifier};

/// Lifetime of the email verification token.
pub const EMAIL_TOKEN_TTL_MINUTES: u32 = 10;

/// Settings the orchestrator needs, resolved once from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingSettings {
    /// Customer group key new customers join.
    pub customer_group: Option<String>,
    /// Associate role key granted on the business unit. Required.
    pub associate_role: Option<String>,
    /// Merchant Center team sellers are invited to.
    pub team_name: Option<String>,
    /// Locale of localized resource names.
    pub locale: String,
    /// Country of the seller's contact address.
    pub address_country: String,
    pub email_token_ttl_minutes: u32,
}

impl Default for OnboardingSettings {
    fn default() -> Self {
        Self {
            customer_group: None,
            associate_role: None,
            team_name: None,
            locale: DEFAULT_LOCALE.to_string(),
            address_country: "US".to_string(),
            email_token_ttl_minutes: EMAIL_TOKEN_TTL_MINUTES,
        }
    }
}

impl OnboardingSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            customer_group: config.onboarding.customer_group.clone(),
            associate_role: config.onboarding.associate_role.clone(),
            team_name: config.onboarding.team_name.clone(),
            ..Self::default()
        }
    }

    /// Customer group key, if set and non-blank.
    #[must_use]
    pub fn customer_group(&self) -> Option<&str> {
        non_blank(self.customer_group.as_deref())
    }

    /// Associate role key, if set and non-blank.
    #[must_use]
    pub fn associate_role(&self) -> Option<&str> {
        non_blank(self.associate_role.as_deref())
    }

    /// Merchant Center team name, if set and non-blank.
    #[must_use]
    pub fn team_name(&self) -> Option<&str> {
        non_blank(self.team_name.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// The commercetools operations onboarding performs.
pub trait CommercePlatform: Send + Sync {
    fn create_customer(
        &self,
        draft: &CustomerDraft,
    ) -> impl Future<Output = Result<Customer, CommercetoolsError>> + Send;

    fn create_email_token(
        &self,
        customer_id: &CustomerId,
        ttl_minutes: u32,
    ) -> impl Future<Output = Result<CustomerToken, CommercetoolsError>> + Send;

    fn confirm_email(
        &self,
        token_value: &str,
    ) -> impl Future<Output = Result<Customer, CommercetoolsError>> + Send;

    fn create_channel(
        &self,
        draft: &ChannelDraft,
    ) -> impl Future<Output = Result<Channel, CommercetoolsError>> + Send;

    fn create_store(
        &self,
        draft: &StoreDraft,
    ) -> impl Future<Output = Result<Store, CommercetoolsError>> + Send;

    fn create_product_selection(
        &self,
        draft: &ProductSelectionDraft,
    ) -> impl Future<Output = Result<ProductSelection, CommercetoolsError>> + Send;

    fn add_product_selection_to_store(
        &self,
        store_key: &str,
        version: i64,
        selection_id: &ProductSelectionId,
        active: bool,
    ) -> impl Future<Output = Result<Store, CommercetoolsError>> + Send;

    fn create_business_unit(
        &self,
        draft: &BusinessUnitDraft,
    ) -> impl Future<Output = Result<BusinessUnit, CommercetoolsError>> + Send;
}

impl CommercePlatform for CommercetoolsClient {
    async fn create_customer(&self, draft: &CustomerDraft) -> Result<Customer, CommercetoolsError> {
        Self::create_customer(self, draft).await
    }

    async fn create_email_token(
        &self,
        customer_id: &CustomerId,
        ttl_minutes: u32,
    ) -> Result<CustomerToken, CommercetoolsError> {
        Self::create_email_token(self, customer_id, ttl_minutes).await
    }

    async fn confirm_email(&self, token_value: &str) -> Result<Customer, CommercetoolsError> {
        Self::confirm_email(self, token_value).await
    }

    async fn create_channel(&self, draft: &ChannelDraft) -> Result<Channel, CommercetoolsError> {
        Self::create_channel(self, draft).await
    }

    async fn create_store(&self, draft: &StoreDraft) -> Result<Store, CommercetoolsError> {
        Self::create_store(self, draft).await
    }

    async fn create_product_selection(
        &self,
        draft: &ProductSelectionDraft,
    ) -> Result<ProductSelection, CommercetoolsError> {
        Self::create_product_selection(self, draft).await
    }

    async fn add_product_selection_to_store(
        &self,
        store_key: &str,
        version: i64,
        selection_id: &ProductSelectionId,
        active: bool,
    ) -> Result<Store, CommercetoolsError> {
        Self::add_product_selection_to_store(self, store_key, version, selection_id, active).await
    }

    async fn create_business_unit(
        &self,
        draft: &BusinessUnitDraft,
    ) -> Result<BusinessUnit, CommercetoolsError> {
        Self::create_business_unit(self, draft).await
    }
}

/// Sends Merchant Center invitations.
pub trait InvitationSender: Send + Sync {
    fn invite(
        &self,
        email: &str,
        team_name: Option<&str>,
    ) -> impl Future<Output = Result<InvitationReceipt, InvitationError>> + Send;
}

impl InvitationSender for MerchantCenterClient {
    async fn invite(
        &self,
        email: &str,
        team_name: Option<&str>,
    ) -> Result<InvitationReceipt, InvitationError> {
        Self::invite(self, email, team_name).await
    }
}

/// Runs onboarding against a commerce platform and the Merchant Center.
#[derive(Debug)]
pub struct Onboarder<P, I, N> {
    platform: P,
    invitations: I,
    notifier: N,
    settings: OnboardingSettings,
}

impl<P, I, N> Onboarder<P, I, N>
where
    P: CommercePlatform,
    I: InvitationSender,
    N: Notifier,
{
    #[must_use]
    pub const fn new(
        platform: P,
        invitations: I,
        notifier: N,
        settings: OnboardingSettings,
    ) -> Self {
        Self {
            platform,
            invitations,
            notifier,
            settings,
        }
    }

    #[must_use]
    pub const fn platform(&self) -> &P {
        &self.platform
    }

    #[must_use]
    pub const fn invitations(&self) -> &I {
        &self.invitations
    }

    #[must_use]
    pub const fn notifier(&self) -> &N {
        &self.notifier
    }

    #[must_use]
    pub const fn settings(&self) -> &OnboardingSettings {
        &self.settings
    }

    /// Validate a raw form and onboard it.
    ///
    /// # Errors
    ///
    /// Returns `OnboardingError::Validation` without any remote call if the
    /// form is invalid, otherwise whatever [`Self::onboard`] returns.
    pub async fn submit(
        &self,
        flow: OnboardingFlow,
        form: &OnboardingForm,
    ) -> Result<OnboardingSummary, OnboardingError> {
        let request = form.validate().map_err(|errors| {
            tracing::warn!(%flow, %errors, "Onboarding form rejected");
            OnboardingError::Validation(errors)
        })?;
        self.onboard(flow, &request).await
    }

    /// Onboard a validated request.
    ///
    /// Emits exactly one error notification on failure. On success, emits
    /// the invitation notification (sellers) followed by the success
    /// notification.
    ///
    /// # Errors
    ///
    /// Returns the first failure. Resources created before it remain and are
    /// listed in [`OnboardingError::trail`].
    #[instrument(skip(self, request), fields(company = %request.company_name()))]
    pub async fn onboard(
        &self,
        flow: OnboardingFlow,
        request: &OnboardingRequest,
    ) -> Result<OnboardingSummary, OnboardingError> {
        tracing::info!(name = %request.full_name(), "Starting onboarding");

        match self.run(flow, request).await {
            Ok(summary) => {
                tracing::info!(
                    customer_id = %summary.customer_id,
                    business_unit_id = %summary.business_unit_id,
                    "Onboarding complete"
                );
                self.notifier.notify(Notification::onboarded(flow, request));
                Ok(summary)
            }
            Err(err) => {
                tracing::error!(error = %err, "Onboarding failed");
                if let Some(trail) = err.trail().filter(|t| !t.is_empty()) {
                    tracing::error!(created = %trail, "Resources left behind by failed onboarding");
                }
                sentry::capture_error(&err);
                self.notifier.notify(Notification::onboarding_failed(flow));
                Err(err)
            }
        }
    }

    /// Invite `email` to the Merchant Center on its own, notifying the result.
    ///
    /// # Errors
    ///
    /// Returns the invitation failure after emitting a warning notification.
    pub async fn invite(&self, email: &Email) -> Result<InvitationReceipt, InvitationError> {
        let result = self
            .invitations
            .invite(email.as_str(), self.settings.team_name())
            .await;

        match &result {
            Ok(_) => self.notifier.notify(Notification::invitation_sent(email)),
            Err(err) => {
                tracing::warn!(email = %email, error = %err, "Merchant Center invitation failed");
                self.notifier.notify(Notification::invitation_failed(email));
            }
        }
        result
    }

    async fn run(
        &self,
        flow: OnboardingFlow,
        request: &OnboardingRequest,
    ) -> Result<OnboardingSummary, OnboardingError> {
        let key = request.company_key();
        let mut trail = AuditTrail::default();

        // 1. Customer
        let customer = self
            .platform
            .create_customer(&drafts::customer_draft(request, &self.settings))
            .await
            .map_err(|source| step_failed(OnboardingStep::CreateCustomer, &trail, source))?;
        trail.record(OnboardingStep::CreateCustomer, customer.id.as_str(), None);

        // 2. Email verification
        let token = self
            .platform
            .create_email_token(&customer.id, self.settings.email_token_ttl_minutes)
            .await
            .map_err(|source| step_failed(OnboardingStep::CreateEmailToken, &trail, source))?;
        if token.value.trim().is_empty() {
            return Err(OnboardingError::EmailVerification {
                reason: "verification token is empty".to_string(),
                trail,
            });
        }
        trail.record(OnboardingStep::CreateEmailToken, token.id.as_str(), None);

        let verified = self
            .platform
            .confirm_email(&token.value)
            .await
            .map_err(|source| step_failed(OnboardingStep::ConfirmEmail, &trail, source))?;
        if !verified.is_email_verified {
            return Err(OnboardingError::EmailVerification {
                reason: format!("customer {} is still unverified", verified.id),
                trail,
            });
        }
        trail.record(OnboardingStep::ConfirmEmail, verified.id.as_str(), None);

        // 3. Channel
        let channel = self
            .platform
            .create_channel(&drafts::channel_draft(request, &key, &self.settings))
            .await
            .map_err(|source| step_failed(OnboardingStep::CreateChannel, &trail, source))?;
        trail.record(
            OnboardingStep::CreateChannel,
            channel.id.as_str(),
            Some(channel.key.clone()),
        );

        // 4. Store
        let store = self
            .platform
            .create_store(&drafts::store_draft(flow, request, &key, &self.settings))
            .await
            .map_err(|source| step_failed(OnboardingStep::CreateStore, &trail, source))?;
        trail.record(
            OnboardingStep::CreateStore,
            store.id.as_str(),
            Some(store.key.clone()),
        );

        // 5. Product selection
        let product_selection_id = if flow.is_seller() {
            let selection = self
                .platform
                .create_product_selection(&drafts::product_selection_draft(
                    request,
                    &key,
                    &self.settings,
                ))
                .await
                .map_err(|source| {
                    step_failed(OnboardingStep::CreateProductSelection, &trail, source)
                })?;
            trail.record(
                OnboardingStep::CreateProductSelection,
                selection.id.as_str(),
                selection.key.clone(),
            );

            let updated = self
                .platform
                .add_product_selection_to_store(&store.key, store.version, &selection.id, true)
                .await
                .map_err(|source| {
                    step_failed(OnboardingStep::AssignProductSelection, &trail, source)
                })?;
            trail.record(
                OnboardingStep::AssignProductSelection,
                updated.id.as_str(),
                Some(updated.key.clone()),
            );

            Some(selection.id)
        } else {
            None
        };

        // 6. Business unit
        let Some(associate_role) = self.settings.associate_role() else {
            return Err(OnboardingError::MissingConfig {
                name: "ASSOCIATE_ROLE",
                trail,
            });
        };
        let unit = self
            .platform
            .create_business_unit(&drafts::business_unit_draft(
                flow,
                request,
                &key,
                &customer.id,
                associate_role,
                &self.settings,
            ))
            .await
            .map_err(|source| step_failed(OnboardingStep::CreateBusinessUnit, &trail, source))?;
        trail.record(
            OnboardingStep::CreateBusinessUnit,
            unit.id.as_str(),
            Some(unit.key.clone()),
        );

        // 7. Merchant Center invitation
        let invitation = if flow.is_seller() {
            match self.invite(request.email()).await {
                Ok(receipt) => InvitationOutcome::Sent(receipt),
                Err(err) => InvitationOutcome::Failed(err.to_string()),
            }
        } else {
            InvitationOutcome::NotRequested
        };

        Ok(OnboardingSummary {
            flow,
            company_key: key,
            customer_id: customer.id,
            channel_id: channel.id,
            store_id: store.id,
            product_selection_id,
            business_unit_id: unit.id,
            invitation,
            trail,
        })
    }
}

fn step_failed(
    step: OnboardingStep,
    trail: &AuditTrail,
    source: CommercetoolsError,
) -> OnboardingError {
    OnboardingError::Step {
        step,
        trail: trail.clone(),
        source,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests;
