//! Sellertools onboarding library.
//!
//! Onboards sellers and B2B customers into a commercetools project: creates
//! the customer, verifies their email, sets up a channel, store, (for
//! sellers) product selection and a business unit, then invites sellers to
//! the Merchant Center.
//!
//! # Security
//!
//! The commercetools API client needs `manage_project` scope. Keep
//! `CTP_CLIENT_SECRET` and `MC_ACCESS_TOKEN` out of logs; both are held as
//! [`secrecy::SecretString`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod commercetools;
pub mod config;
pub mod merchant_center;
pub mod services;

pub use config::{AppConfig, ConfigError};
pub use services::notifications::{CollectingNotifier, LogNotifier, Notification, Notifier};
pub use services::onboarding::{
    CommercePlatform, InvitationOutcome, InvitationSender, Onboarder, OnboardingError,
    OnboardingSettings, OnboardingSummary,
};
