//! Records an SMS is sent about, and the contacts linked to them.

use super::{Locale, RecipientId, RecordId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Record field holding a mobile number.
pub const MOBILE_FIELD: &str = "mobile";
/// Record field holding a landline number.
pub const PHONE_FIELD: &str = "phone";

/// Contact linked to a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    id: RecipientId,
    name: String,
    mobile: Option<String>,
    phone: Option<String>,
    locale: Option<Locale>,
}

impl Recipient {
    /// Creates a contact without numbers.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: RecipientId::new(),
            name: name.into(),
            mobile: None,
            phone: None,
            locale: None,
        }
    }

    /// Sets the mobile number.
    #[must_use]
    pub fn with_mobile(mut self, mobile: impl Into<String>) -> Self {
        self.mobile = Some(mobile.into());
        self
    }

    /// Sets the landline number.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Sets the preferred locale.
    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = Some(locale);
        self
    }

    /// Returns the contact identifier.
    #[must_use]
    pub const fn id(&self) -> RecipientId {
        self.id
    }

    /// Returns the contact name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the mobile number as entered.
    #[must_use]
    pub fn mobile(&self) -> Option<&str> {
        self.mobile.as_deref()
    }

    /// Returns the landline number as entered.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Returns the preferred locale.
    #[must_use]
    pub const fn locale(&self) -> Option<&Locale> {
        self.locale.as_ref()
    }
}

/// Business record targeted by a broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRecord {
    id: RecordId,
    display_name: String,
    fields: BTreeMap<String, String>,
    recipient: Option<Recipient>,
}

impl TargetRecord {
    /// Creates a record without fields nor recipient.
    #[must_use]
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(),
            display_name: display_name.into(),
            fields: BTreeMap::new(),
            recipient: None,
        }
    }

    /// Sets a named field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Links a contact.
    #[must_use]
    pub fn with_recipient(mut self, recipient: Recipient) -> Self {
        self.recipient = Some(recipient);
        self
    }

    /// Returns the record identifier.
    #[must_use]
    pub const fn id(&self) -> RecordId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns a named field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Returns every field.
    #[must_use]
    pub const fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// Returns the linked contact.
    #[must_use]
    pub const fn recipient(&self) -> Option<&Recipient> {
        self.recipient.as_ref()
    }

    /// Returns the raw number an SMS about this record goes to.
    ///
    /// With `number_field` only that field is read. Otherwise the first
    /// non-blank of the recipient's mobile and phone, then the record's
    /// `mobile` and `phone` fields, is used.
    #[must_use]
    pub fn number(&self, number_field: Option<&str>) -> Option<&str> {
        if let Some(field) = number_field {
            return self.field(field).filter(|value| !value.trim().is_empty());
        }
        let recipient = self.recipient.as_ref();
        [
            recipient.and_then(Recipient::mobile),
            recipient.and_then(Recipient::phone),
            self.field(MOBILE_FIELD),
            self.field(PHONE_FIELD),
        ]
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
    }
}
