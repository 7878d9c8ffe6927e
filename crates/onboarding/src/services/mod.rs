//! Services built on the API clients.

pub mod notifications;
pub mod onboarding;
pub mod settings;
