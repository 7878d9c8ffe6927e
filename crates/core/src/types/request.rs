//! Onboarding form input and its validated request.
//!
//! An [`OnboardingForm`] holds the raw strings a user submitted. Only
//! [`OnboardingForm::validate`] can turn it into an [`OnboardingRequest`], so
//! a request with a missing field or a malformed email/phone can never reach
//! the orchestrator.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::email::Email;
use super::key::CompanyKey;
use super::phone::PhoneNumber;

/// A field of the onboarding form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    CompanyName,
    FirstName,
    LastName,
    Email,
    PhoneNumber,
}

impl FormField {
    /// Form label shown next to the input.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CompanyName => "Company Name",
            Self::FirstName => "First Name",
            Self::LastName => "Last Name",
            Self::Email => "Email Address",
            Self::PhoneNumber => "Phone Number",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a single field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldError {
    /// A required field is empty or blank.
    Missing,
    /// The field is present but malformed.
    Invalid,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "This field is required"),
            Self::Invalid => write!(f, "This field is invalid"),
        }
    }
}

/// Field-scoped validation errors, at most one per field, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors(Vec<(FormField, FieldError)>);

impl FormErrors {
    fn set(&mut self, field: FormField, error: FieldError) {
        if let Some(entry) = self.0.iter_mut().find(|(f, _)| *f == field) {
            entry.1 = error;
        } else {
            self.0.push((field, error));
        }
    }

    /// Returns the error for a field, if any.
    #[must_use]
    pub fn get(&self, field: FormField) -> Option<FieldError> {
        self.0.iter().find(|(f, _)| *f == field).map(|(_, e)| *e)
    }

    /// Returns true if no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over failing fields in form order.
    pub fn iter(&self) -> impl Iterator<Item = (FormField, FieldError)> + '_ {
        self.0.iter().copied()
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, error)| format!("{field}: {error}"))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for FormErrors {}

/// Raw onboarding form values as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingForm {
    pub company_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
}

impl OnboardingForm {
    /// Validate the form and build an [`OnboardingRequest`].
    ///
    /// Company name, first name, last name and email are required (blank
    /// counts as missing). The email format is checked only when an email was
    /// given; the phone number is optional and checked only when non-blank.
    ///
    /// # Errors
    ///
    /// Returns every failing field at once.
    pub fn validate(&self) -> Result<OnboardingRequest, FormErrors> {
        let mut errors = FormErrors::default();

        for (field, value) in [
            (FormField::CompanyName, &self.company_name),
            (FormField::FirstName, &self.first_name),
            (FormField::LastName, &self.last_name),
            (FormField::Email, &self.email),
        ] {
            if value.trim().is_empty() {
                errors.set(field, FieldError::Missing);
            }
        }

        let email = if self.email.trim().is_empty() {
            None
        } else {
            match Email::parse(&self.email) {
                Ok(email) => Some(email),
                Err(_) => {
                    errors.set(FormField::Email, FieldError::Invalid);
                    None
                }
            }
        };

        let phone_number = if self.phone_number.trim().is_empty() {
            None
        } else {
            match PhoneNumber::parse(&self.phone_number) {
                Ok(phone) => Some(phone),
                Err(_) => {
                    errors.set(FormField::PhoneNumber, FieldError::Invalid);
                    None
                }
            }
        };

        match email {
            Some(email) if errors.is_empty() => Ok(OnboardingRequest {
                company_name: self.company_name.clone(),
                first_name: self.first_name.clone(),
                last_name: self.last_name.clone(),
                email,
                phone_number,
            }),
            _ => Err(errors),
        }
    }
}

/// A validated onboarding request.
///
/// Fields are private; the only way to build one is
/// [`OnboardingForm::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingRequest {
    company_name: String,
    first_name: String,
    last_name: String,
    email: Email,
    phone_number: Option<PhoneNumber>,
}

impl OnboardingRequest {
    /// Company name exactly as entered (used for display names).
    #[must_use]
    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }

    #[must_use]
    pub const fn phone_number(&self) -> Option<&PhoneNumber> {
        self.phone_number.as_ref()
    }

    /// "First Last", as shown in the success notification.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Key all created resources derive from.
    #[must_use]
    pub fn company_key(&self) -> CompanyKey {
        CompanyKey::derive(&self.company_name)
    }
}
