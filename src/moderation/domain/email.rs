//! Normalised email address type.

use super::ModerationDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for an email address, matching the `VARCHAR(254)` column.
const MAX_EMAIL_LENGTH: usize = 254;

/// Validated, lowercase email address.
///
/// Accepts both bare addresses (`test0@example.com`) and display forms
/// (`"MyName" <Test0@Example.com>`); only the address part is kept, so two
/// spellings of the same mailbox compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parses and normalises an email address.
    ///
    /// # Errors
    ///
    /// Returns [`ModerationDomainError::EmptyEmail`] when nothing remains
    /// after trimming, or [`ModerationDomainError::InvalidEmail`] when the
    /// value is not a single `local@domain` mailbox.
    pub fn parse(value: impl AsRef<str>) -> Result<Self, ModerationDomainError> {
        let raw = value.as_ref();
        let address = extract_address(raw).trim().to_lowercase();

        if address.is_empty() {
            return Err(ModerationDomainError::EmptyEmail);
        }
        if address.len() > MAX_EMAIL_LENGTH {
            return Err(ModerationDomainError::InvalidEmail(raw.to_owned()));
        }

        let mut parts = address.split('@');
        let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ModerationDomainError::InvalidEmail(raw.to_owned()));
        };
        let domain_ok = !domain.is_empty()
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && !domain.contains("..");
        if local.is_empty() || !domain_ok || address.chars().any(char::is_whitespace) {
            return Err(ModerationDomainError::InvalidEmail(raw.to_owned()));
        }

        Ok(Self(address))
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Formats the address with a display name, `"Name" <address>`.
    #[must_use]
    pub fn with_display_name(&self, name: &str) -> String {
        let escaped = name.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{escaped}\" <{}>", self.0)
    }
}

/// Returns the mailbox part of `"Name" <mailbox>` forms, or the input.
fn extract_address(raw: &str) -> &str {
    match (raw.rfind('<'), raw.rfind('>')) {
        (Some(open), Some(close)) if open < close => raw.get(open + 1..close).unwrap_or(raw),
        _ => raw,
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = ModerationDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<&str> for EmailAddress {
    type Error = ModerationDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}
