//! Phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::key::is_form_whitespace;

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneNumberError {
    /// Nothing follows the optional leading `+`.
    #[error("phone number cannot be empty")]
    Empty,
    /// A character other than digits, whitespace, `-`, `(` or `)` was found.
    #[error("phone number contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// A loosely formatted phone number.
///
/// Accepts an optional leading `+` followed by one or more ASCII digits,
/// whitespace, hyphens and parentheses. No length or country checks are made.
///
/// ```
/// use sellertools_core::PhoneNumber;
///
/// assert!(PhoneNumber::parse("+1 (555) 010-2030").is_ok());
/// assert!(PhoneNumber::parse("555-0100").is_ok());
/// assert!(PhoneNumber::parse("call me").is_err());
/// assert!(PhoneNumber::parse("+").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parse a `PhoneNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty (ignoring a leading `+`) or
    /// contains a character outside the accepted set.
    pub fn parse(s: &str) -> Result<Self, PhoneNumberError> {
        let body = s.strip_prefix('+').unwrap_or(s);

        if body.is_empty() {
            return Err(PhoneNumberError::Empty);
        }

        if let Some(bad) = body.chars().find(|&c| !is_phone_char(c)) {
            return Err(PhoneNumberError::InvalidCharacter(bad));
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the phone number as entered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

const fn is_phone_char(c: char) -> bool {
    c.is_ascii_digit() || is_form_whitespace(c) || matches!(c, '-' | '(' | ')')
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = PhoneNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}
