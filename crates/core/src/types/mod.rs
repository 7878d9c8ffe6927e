//! Core types for Sellertools.
//!
//! This module provides type-safe wrappers for onboarding domain concepts.

pub mod email;
pub mod id;
pub mod key;
pub mod phone;
pub mod request;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use key::CompanyKey;
pub use phone::{PhoneNumber, PhoneNumberError};
pub use request::{FieldError, FormErrors, FormField, OnboardingForm, OnboardingRequest};
pub use status::*;
