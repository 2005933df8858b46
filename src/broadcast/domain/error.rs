//! Error types for broadcast domain validation.

use thiserror::Error;

/// Errors returned while constructing broadcast domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BroadcastDomainError {
    /// The template body is empty after trimming.
    #[error("SMS template body must not be empty")]
    EmptyTemplateBody,

    /// The locale tag is not `language` or `language_REGION`.
    #[error("invalid locale: {0}")]
    InvalidLocale(String),
}

/// Errors returned while sanitising a phone number.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PhoneNumberError {
    /// Nothing remains once separators are stripped.
    #[error("phone number must not be empty")]
    Empty,

    /// The number contains characters other than digits and separators.
    #[error("phone number contains invalid characters: {0}")]
    InvalidCharacters(String),

    /// A national number was given but no default calling code is set.
    #[error("phone number has no country calling code: {0}")]
    MissingCallingCode(String),

    /// The calling code is not one to three digits without a leading zero.
    #[error("invalid country calling code: {0}")]
    InvalidCallingCode(String),

    /// The international number is too short, too long or starts with zero.
    #[error("phone number has an invalid length: {0}")]
    InvalidLength(String),
}
