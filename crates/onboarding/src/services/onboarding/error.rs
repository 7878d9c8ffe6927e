//! Onboarding errors.

use thiserror::Error;

use sellertools_core::{FormErrors, OnboardingStep};

use super::AuditTrail;
use crate::commercetools::CommercetoolsError;

/// Why an onboarding run did not complete.
///
/// A failed Merchant Center invitation is not an error; it is reported on
/// the [`OnboardingSummary`](super::OnboardingSummary) instead.
#[derive(Debug, Error)]
pub enum OnboardingError {
    /// The form was rejected before any remote call.
    #[error("Invalid onboarding form: {0}")]
    Validation(FormErrors),

    /// A required setting is absent.
    #[error("Missing configuration: {name}")]
    MissingConfig {
        name: &'static str,
        trail: AuditTrail,
    },

    /// The customer's email could not be verified.
    #[error("Email verification failed: {reason}")]
    EmailVerification { reason: String, trail: AuditTrail },

    /// A remote step failed; later steps were not attempted.
    #[error("Failed to {step}: {source}")]
    Step {
        step: OnboardingStep,
        trail: AuditTrail,
        #[source]
        source: CommercetoolsError,
    },
}

impl OnboardingError {
    /// Resources created before the failure. They are not rolled back.
    #[must_use]
    pub const fn trail(&self) -> Option<&AuditTrail> {
        match self {
            Self::Validation(_) => None,
            Self::MissingConfig { trail, .. }
            | Self::EmailVerification { trail, .. }
            | Self::Step { trail, .. } => Some(trail),
        }
    }

    /// The step that failed, if the failure happened during a remote call.
    #[must_use]
    pub const fn step(&self) -> Option<OnboardingStep> {
        match self {
            Self::Step { step, .. } => Some(*step),
            _ => None,
        }
    }

    /// Whether a uniqueness conflict caused the failure, typically because
    /// the company was already onboarded.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Step { source, .. } if source.is_conflict())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_error_display() {
        let err = OnboardingError::Step {
            step: OnboardingStep::CreateChannel,
            trail: AuditTrail::default(),
            source: CommercetoolsError::Conflict("Version mismatch".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Failed to create channel: Conflict: Version mismatch"
        );
        assert!(err.is_conflict());
        assert_eq!(err.step(), Some(OnboardingStep::CreateChannel));
    }

    #[test]
    fn test_missing_config_display() {
        let err = OnboardingError::MissingConfig {
            name: "ASSOCIATE_ROLE",
            trail: AuditTrail::default(),
        };
        assert_eq!(err.to_string(), "Missing configuration: ASSOCIATE_ROLE");
        assert!(err.step().is_none());
    }
}
