//! Resource keys derived from a company name.
//!
//! Every resource created during onboarding is addressed by a key computed
//! from the company name, so the steps can reference each other without
//! looking anything up.

use core::fmt;

use serde::Serialize;

/// Slugified company name shared by all onboarding resource keys.
///
/// Derivation: lower-case the whole name, then collapse every run of
/// [form whitespace](is_form_whitespace) into a single hyphen. Nothing else
/// is sanitised; punctuation and non-ASCII characters pass through, and
/// leading or trailing whitespace turns into a leading or trailing hyphen.
///
/// ```
/// use sellertools_core::CompanyKey;
///
/// let key = CompanyKey::derive("Acme Co");
/// assert_eq!(key.as_str(), "acme-co");
/// assert_eq!(key.channel_key(), "acme-co-channel");
/// assert_eq!(key.store_key(), "acme-co-store");
/// assert_eq!(key.product_selection_key(), "acme-co-selection");
/// assert_eq!(key.business_unit_key(), "acme-co");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CompanyKey(String);

impl CompanyKey {
    /// Derive the key for a company name.
    #[must_use]
    pub fn derive(company_name: &str) -> Self {
        // Whole-string lowering keeps context rules such as final sigma.
        let lowered = company_name.to_lowercase();
        let mut key = String::with_capacity(lowered.len());
        let mut in_whitespace = false;

        for c in lowered.chars() {
            if is_form_whitespace(c) {
                if !in_whitespace {
                    key.push('-');
                }
                in_whitespace = true;
            } else {
                key.push(c);
                in_whitespace = false;
            }
        }

        Self(key)
    }

    /// Returns the bare slug.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key of the supply/distribution channel.
    #[must_use]
    pub fn channel_key(&self) -> String {
        format!("{}-channel", self.0)
    }

    /// Key of the store.
    #[must_use]
    pub fn store_key(&self) -> String {
        format!("{}-store", self.0)
    }

    /// Key of the seller's product selection.
    #[must_use]
    pub fn product_selection_key(&self) -> String {
        format!("{}-selection", self.0)
    }

    /// Key of the business unit (the bare slug).
    #[must_use]
    pub fn business_unit_key(&self) -> String {
        self.0.clone()
    }

    /// Key of the business unit's contact address.
    #[must_use]
    pub fn address_key(&self) -> String {
        format!("{}-address", self.0)
    }
}

/// Whitespace as the onboarding form's `\s` patterns match it.
///
/// Unicode `White_Space` without NEL (U+0085), plus the byte order mark
/// (U+FEFF).
#[must_use]
pub const fn is_form_whitespace(c: char) -> bool {
    match c {
        '\u{85}' => false,
        '\u{FEFF}' => true,
        _ => c.is_whitespace(),
    }
}

impl fmt::Display for CompanyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CompanyKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
