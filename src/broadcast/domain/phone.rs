//! Phone number sanitisation to E.164.

use super::PhoneNumberError;
use serde::{Deserialize, Serialize};
use std::fmt;

const MIN_DIGITS: usize = 8;
const MAX_DIGITS: usize = 15;
const SEPARATORS: &[char] = &[' ', '\t', '-', '.', '/', '(', ')'];

/// Canonical destination in E.164 form (`+` followed by digits).
///
/// Two raw spellings of the same number sanitise to equal values, which is
/// what makes them the same destination for deduplication and blacklists.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Returns the canonical `+<digits>` form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Turns raw user input into [`PhoneNumber`] values.
///
/// # Examples
///
/// ```
/// use courier::broadcast::domain::PhoneSanitizer;
///
/// let sanitizer = PhoneSanitizer::with_default_calling_code("32").unwrap();
/// let national = sanitizer.sanitize("0456 00 11 22").unwrap();
/// let international = sanitizer.sanitize("+32 456/00.11.22").unwrap();
/// assert_eq!(national, international);
/// assert_eq!(national.as_str(), "+32456001122");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhoneSanitizer {
    default_calling_code: Option<String>,
}

impl PhoneSanitizer {
    /// Creates a sanitizer accepting only international numbers.
    #[must_use]
    pub const fn international_only() -> Self {
        Self {
            default_calling_code: None,
        }
    }

    /// Creates a sanitizer completing national numbers with `code`.
    ///
    /// A leading `+` on the code is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneNumberError::InvalidCallingCode`] unless the code is
    /// one to three digits without a leading zero.
    pub fn with_default_calling_code(code: &str) -> Result<Self, PhoneNumberError> {
        let trimmed = code.trim();
        let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
        let valid = (1..=3).contains(&digits.len())
            && digits.chars().all(|c| c.is_ascii_digit())
            && !digits.starts_with('0');
        if !valid {
            return Err(PhoneNumberError::InvalidCallingCode(code.to_owned()));
        }
        Ok(Self {
            default_calling_code: Some(digits.to_owned()),
        })
    }

    /// Returns the configured default calling code, without `+`.
    #[must_use]
    pub fn default_calling_code(&self) -> Option<&str> {
        self.default_calling_code.as_deref()
    }

    /// Sanitises a raw number.
    ///
    /// Separators are stripped. A leading `+` or `00` introduces an
    /// international number; anything else is national, loses its `0` trunk
    /// prefix and gets the default calling code.
    ///
    /// # Errors
    ///
    /// Returns a [`PhoneNumberError`] describing why the input is not a
    /// usable destination.
    pub fn sanitize(&self, raw: &str) -> Result<PhoneNumber, PhoneNumberError> {
        let compact: String = raw.chars().filter(|c| !SEPARATORS.contains(c)).collect();
        if compact.is_empty() {
            return Err(PhoneNumberError::Empty);
        }

        let digits = if let Some(rest) = compact.strip_prefix('+') {
            rest.to_owned()
        } else if let Some(rest) = compact.strip_prefix("00") {
            rest.to_owned()
        } else {
            if !is_digits(&compact) {
                return Err(PhoneNumberError::InvalidCharacters(raw.to_owned()));
            }
            let code = self
                .default_calling_code
                .as_deref()
                .ok_or_else(|| PhoneNumberError::MissingCallingCode(raw.to_owned()))?;
            let national = compact.strip_prefix('0').unwrap_or(&compact);
            format!("{code}{national}")
        };

        if !is_digits(&digits) {
            return Err(PhoneNumberError::InvalidCharacters(raw.to_owned()));
        }
        if !(MIN_DIGITS..=MAX_DIGITS).contains(&digits.len()) || digits.starts_with('0') {
            return Err(PhoneNumberError::InvalidLength(raw.to_owned()));
        }
        Ok(PhoneNumber(format!("+{digits}")))
    }
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

/// Splits a user-entered list of numbers on commas, semicolons and new
/// lines, dropping blank entries.
#[must_use]
pub fn parse_number_list(raw: &str) -> Vec<String> {
    raw.split([',', ';', '\n'])
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_owned)
        .collect()
}
