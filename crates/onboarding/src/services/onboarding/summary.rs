//! Audit trail and result of an onboarding run.

use core::fmt;

use sellertools_core::{
    BusinessUnitId, ChannelId, CompanyKey, CustomerId, OnboardingFlow, OnboardingStep,
    ProductSelectionId, StoreId,
};

use crate::merchant_center::InvitationReceipt;

/// A resource created (or modified) by one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub step: OnboardingStep,
    /// Remote ID of the resource.
    pub id: String,
    pub key: Option<String>,
}

/// Ordered record of what an onboarding run has done so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditTrail {
    entries: Vec<AuditEntry>,
}

impl AuditTrail {
    pub(crate) fn record(
        &mut self,
        step: OnboardingStep,
        id: impl Into<String>,
        key: Option<String>,
    ) {
        let entry = AuditEntry {
            step,
            id: id.into(),
            key,
        };
        tracing::debug!(
            step = %entry.step,
            id = %entry.id,
            key = ?entry.key,
            "Onboarding step completed"
        );
        self.entries.push(entry);
    }

    #[must_use]
    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Steps completed, in order.
    #[must_use]
    pub fn steps(&self) -> Vec<OnboardingStep> {
        self.entries.iter().map(|e| e.step).collect()
    }
}

impl fmt::Display for AuditTrail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return f.write_str("(nothing created)");
        }
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}. {}: {}", i + 1, entry.step, entry.id)?;
            if let Some(key) = &entry.key {
                write!(f, " (key {key})")?;
            }
        }
        Ok(())
    }
}

/// What happened to the Merchant Center invitation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvitationOutcome {
    /// Customer flow; no invitation is sent.
    NotRequested,
    Sent(InvitationReceipt),
    /// The invitation failed; onboarding still succeeded.
    Failed(String),
}

/// Identifiers of everything a successful onboarding created.
#[derive(Debug, Clone)]
pub struct OnboardingSummary {
    pub flow: OnboardingFlow,
    pub company_key: CompanyKey,
    pub customer_id: CustomerId,
    pub channel_id: ChannelId,
    pub store_id: StoreId,
    pub product_selection_id: Option<ProductSelectionId>,
    pub business_unit_id: BusinessUnitId,
    pub invitation: InvitationOutcome,
    pub trail: AuditTrail,
}

impl fmt::Display for OnboardingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Onboarded {} '{}'", self.flow, self.company_key)?;
        writeln!(f, "{}", self.trail)?;
        match &self.invitation {
            InvitationOutcome::NotRequested => write!(f, "Invitation: not requested"),
            InvitationOutcome::Sent(receipt) => {
                write!(f, "Invitation: {} ({})", receipt.email, receipt.status)
            }
            InvitationOutcome::Failed(reason) => write!(f, "Invitation: failed ({reason})"),
        }
    }
}
