//! Status enums for onboarding flows and notifications.

use serde::{Deserialize, Serialize};

/// Which onboarding flow is being run.
///
/// The seller flow is a superset of the customer flow: it also creates a
/// product selection, attaches a contact address when a phone number is
/// given, and invites the seller to the Merchant Center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingFlow {
    Seller,
    Customer,
}

impl OnboardingFlow {
    /// Lower-case noun used in user-facing messages.
    #[must_use]
    pub const fn noun(self) -> &'static str {
        match self {
            Self::Seller => "seller",
            Self::Customer => "customer",
        }
    }

    /// Capitalised noun used at the start of a sentence.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Seller => "Seller",
            Self::Customer => "Customer",
        }
    }

    /// Whether the flow includes the seller-only steps.
    #[must_use]
    pub const fn is_seller(self) -> bool {
        matches!(self, Self::Seller)
    }
}

impl std::fmt::Display for OnboardingFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.noun())
    }
}

impl std::str::FromStr for OnboardingFlow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "seller" => Ok(Self::Seller),
            "customer" => Ok(Self::Customer),
            _ => Err(format!("invalid onboarding flow: {s}")),
        }
    }
}

/// One remote operation in the onboarding pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    CreateCustomer,
    CreateEmailToken,
    ConfirmEmail,
    CreateChannel,
    CreateStore,
    CreateProductSelection,
    AssignProductSelection,
    CreateBusinessUnit,
    SendInvitation,
}

impl OnboardingStep {
    /// Human-readable description for the audit log.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CreateCustomer => "create customer",
            Self::CreateEmailToken => "create email verification token",
            Self::ConfirmEmail => "confirm customer email",
            Self::CreateChannel => "create channel",
            Self::CreateStore => "create store",
            Self::CreateProductSelection => "create product selection",
            Self::AssignProductSelection => "assign product selection to store",
            Self::CreateBusinessUnit => "create business unit",
            Self::SendInvitation => "send Merchant Center invitation",
        }
    }

    /// Whether the step only runs in the seller flow.
    #[must_use]
    pub const fn seller_only(self) -> bool {
        matches!(
            self,
            Self::CreateProductSelection | Self::AssignProductSelection | Self::SendInvitation
        )
    }
}

impl std::fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Warning,
    Error,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Role a commercetools channel can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelRole {
    InventorySupply,
    ProductDistribution,
    OrderExport,
    OrderImport,
    Primary,
}

impl std::fmt::Display for ChannelRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InventorySupply => write!(f, "InventorySupply"),
            Self::ProductDistribution => write!(f, "ProductDistribution"),
            Self::OrderExport => write!(f, "OrderExport"),
            Self::OrderImport => write!(f, "OrderImport"),
            Self::Primary => write!(f, "Primary"),
        }
    }
}
