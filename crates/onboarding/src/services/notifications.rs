//! User-facing notifications.
//!
//! Onboarding reports its outcome as short messages (success, warning or
//! error). Where they end up depends on the [`Notifier`]: the CLI logs them
//! through `tracing`, tests collect them in memory.

use std::sync::Mutex;

use sellertools_core::{Email, NotificationKind, OnboardingFlow, OnboardingRequest};

/// A message shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub text: String,
}

impl Notification {
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Warning,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            text: text.into(),
        }
    }

    /// Overall success of an onboarding.
    #[must_use]
    pub fn onboarded(flow: OnboardingFlow, request: &OnboardingRequest) -> Self {
        Self::success(format!(
            "{} {} has been successfully onboarded!",
            flow.label(),
            request.full_name()
        ))
    }

    /// Generic failure; details go to the logs only.
    #[must_use]
    pub fn onboarding_failed(flow: OnboardingFlow) -> Self {
        Self::error(format!("Failed to onboard {}. Please try again.", flow.noun()))
    }

    #[must_use]
    pub fn invitation_sent(email: &Email) -> Self {
        Self::success(format!("Merchant Center invitation sent to {email}"))
    }

    #[must_use]
    pub fn invitation_failed(email: &Email) -> Self {
        Self::warning(format!(
            "Onboarding succeeded, but the Merchant Center invitation to {email} could not be sent."
        ))
    }
}

/// Destination for notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => tracing::info!(kind = "success", "{}", notification.text),
            NotificationKind::Warning => tracing::warn!(kind = "warning", "{}", notification.text),
            NotificationKind::Error => tracing::error!(kind = "error", "{}", notification.text),
        }
    }
}

/// Keeps notifications in memory, in emission order.
#[derive(Debug, Default)]
pub struct CollectingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl CollectingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything received so far.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut notifications) = self.notifications.lock() {
            notifications.push(notification);
        }
    }
}

impl<N: Notifier + ?Sized> Notifier for std::sync::Arc<N> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification);
    }
}
