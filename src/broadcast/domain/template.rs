//! SMS templates with per-locale translations.

use super::{BroadcastDomainError, TemplateId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Locale tag such as `en_US` or `fr`.
///
/// Tags are normalised to `language[_REGION]` with a lowercase language and
/// uppercase region; `fr-fr` and `fr_FR` are the same locale.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale(String);

impl Locale {
    /// Parses and normalises a locale tag.
    ///
    /// # Errors
    ///
    /// Returns [`BroadcastDomainError::InvalidLocale`] when the tag is not a
    /// two or three letter language optionally followed by a region.
    pub fn parse(tag: &str) -> Result<Self, BroadcastDomainError> {
        let invalid = || BroadcastDomainError::InvalidLocale(tag.to_owned());
        let normalized = tag.trim().replace('-', "_");
        let mut parts = normalized.split('_');
        let language = parts.next().filter(|l| is_alpha(l, 2..=3)).ok_or_else(invalid)?;
        let region = parts.next();
        if parts.next().is_some() {
            return Err(invalid());
        }
        match region {
            None => Ok(Self(language.to_ascii_lowercase())),
            Some(region) if is_alpha(region, 2..=3) => Ok(Self(format!(
                "{}_{}",
                language.to_ascii_lowercase(),
                region.to_ascii_uppercase()
            ))),
            Some(_) => Err(invalid()),
        }
    }

    /// Returns the normalised tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_alpha(value: &str, lengths: std::ops::RangeInclusive<usize>) -> bool {
    lengths.contains(&value.len()) && value.chars().all(|c| c.is_ascii_alphabetic())
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Locale {
    type Error = BroadcastDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Locale> for String {
    fn from(value: Locale) -> Self {
        value.0
    }
}

/// Reusable SMS body with translations.
///
/// Bodies are `minijinja` templates; `{{ object.display_name }}` renders the
/// record the SMS is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsTemplate {
    id: TemplateId,
    name: String,
    body: String,
    translations: BTreeMap<Locale, String>,
}

impl SmsTemplate {
    /// Creates a template with its base-language body.
    ///
    /// # Errors
    ///
    /// Returns [`BroadcastDomainError::EmptyTemplateBody`] when the body is
    /// blank.
    pub fn new(
        name: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Self, BroadcastDomainError> {
        let base_body = body.into();
        if base_body.trim().is_empty() {
            return Err(BroadcastDomainError::EmptyTemplateBody);
        }
        Ok(Self {
            id: TemplateId::new(),
            name: name.into(),
            body: base_body,
            translations: BTreeMap::new(),
        })
    }

    /// Adds or replaces the body used for `locale`.
    ///
    /// # Errors
    ///
    /// Returns [`BroadcastDomainError::EmptyTemplateBody`] when the
    /// translation is blank.
    pub fn with_translation(
        mut self,
        locale: Locale,
        body: impl Into<String>,
    ) -> Result<Self, BroadcastDomainError> {
        let translated = body.into();
        if translated.trim().is_empty() {
            return Err(BroadcastDomainError::EmptyTemplateBody);
        }
        self.translations.insert(locale, translated);
        Ok(self)
    }

    /// Returns the template identifier.
    #[must_use]
    pub const fn id(&self) -> TemplateId {
        self.id
    }

    /// Returns the template name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the base-language body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the body for `locale`, falling back to the base body when the
    /// locale is unknown or has no translation.
    #[must_use]
    pub fn body_for(&self, locale: Option<&Locale>) -> &str {
        locale
            .and_then(|l| self.translations.get(l))
            .map_or(self.body.as_str(), String::as_str)
    }
}
