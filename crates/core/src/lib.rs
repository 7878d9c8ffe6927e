//! Sellertools Core - Shared onboarding types.
//!
//! This crate provides the domain types used across all Sellertools components:
//! - `onboarding` - commercetools and Merchant Center clients plus the
//!   onboarding orchestrator
//! - `cli` - Command-line front end for onboarding sellers and customers
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Validated form input, derived resource keys, typed IDs and
//!   status enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
