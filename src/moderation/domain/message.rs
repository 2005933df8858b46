//! Channel messages and their moderation lifecycle.

use super::{
    ChannelId, EmailAddress, MessageId, ModerationDomainError, ParseModerationStatusError,
    PartnerId,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Moderation state of a channel message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageModerationStatus {
    /// Waiting for a moderator decision; not delivered.
    PendingModeration,
    /// Visible on the channel.
    Accepted,
    /// Refused by a moderator; not delivered.
    Rejected,
}

impl MessageModerationStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PendingModeration => "pending_moderation",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for MessageModerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for MessageModerationStatus {
    type Error = ParseModerationStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending_moderation" => Ok(Self::PendingModeration),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseModerationStatusError(value.to_owned())),
        }
    }
}

/// How a message reached the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Posted from the application.
    Comment,
    /// Received through the mail gateway.
    Email,
    /// Generated by the system itself.
    Notification,
}

/// Author of a channel message.
///
/// Known contacts carry a partner, messages received by mail may only carry
/// an address, and system notifications carry neither.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAuthor {
    partner_id: Option<PartnerId>,
    email: Option<EmailAddress>,
}

impl MessageAuthor {
    /// Author known in the directory.
    #[must_use]
    pub const fn partner(partner_id: PartnerId, email: Option<EmailAddress>) -> Self {
        Self {
            partner_id: Some(partner_id),
            email,
        }
    }

    /// Author only known by email address.
    #[must_use]
    pub const fn external(email: EmailAddress) -> Self {
        Self {
            partner_id: None,
            email: Some(email),
        }
    }

    /// The system itself.
    #[must_use]
    pub const fn system() -> Self {
        Self {
            partner_id: None,
            email: None,
        }
    }

    /// Returns the author partner, if known.
    #[must_use]
    pub const fn partner_id(&self) -> Option<PartnerId> {
        self.partner_id
    }

    /// Returns the author email address, if known.
    #[must_use]
    pub const fn email(&self) -> Option<&EmailAddress> {
        self.email.as_ref()
    }

    /// Returns `true` when neither partner nor address is known.
    #[must_use]
    pub const fn is_system(&self) -> bool {
        self.partner_id.is_none() && self.email.is_none()
    }
}

/// Message posted on a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMessage {
    id: MessageId,
    channel_id: ChannelId,
    author: MessageAuthor,
    kind: MessageKind,
    body: String,
    moderation_status: MessageModerationStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for creating a channel message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChannelMessage {
    /// Target channel.
    pub channel_id: ChannelId,
    /// Message author.
    pub author: MessageAuthor,
    /// Message kind.
    pub kind: MessageKind,
    /// Message body.
    pub body: String,
    /// Status decided at creation time.
    pub moderation_status: MessageModerationStatus,
}

impl ChannelMessage {
    /// Creates a message with the status decided by the moderation gate.
    #[must_use]
    pub fn new(params: NewChannelMessage, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: MessageId::new(),
            channel_id: params.channel_id,
            author: params.author,
            kind: params.kind,
            body: params.body,
            moderation_status: params.moderation_status,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Returns the message identifier.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the channel the message was posted on.
    #[must_use]
    pub const fn channel_id(&self) -> ChannelId {
        self.channel_id
    }

    /// Returns the message author.
    #[must_use]
    pub const fn author(&self) -> &MessageAuthor {
        &self.author
    }

    /// Returns the message kind.
    #[must_use]
    pub const fn kind(&self) -> MessageKind {
        self.kind
    }

    /// Returns the message body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the moderation status.
    #[must_use]
    pub const fn moderation_status(&self) -> MessageModerationStatus {
        self.moderation_status
    }

    /// Returns `true` when the message is visible on its channel.
    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        matches!(self.moderation_status, MessageModerationStatus::Accepted)
    }

    /// Returns `true` while the message awaits a moderator.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(
            self.moderation_status,
            MessageModerationStatus::PendingModeration
        )
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Accepts a pending message.
    ///
    /// # Errors
    ///
    /// Returns [`ModerationDomainError::InvalidModerationTransition`] when
    /// the message is not pending.
    pub fn accept(&mut self, clock: &impl Clock) -> Result<(), ModerationDomainError> {
        self.transition(MessageModerationStatus::Accepted, clock)
    }

    /// Rejects a pending message.
    ///
    /// # Errors
    ///
    /// Returns [`ModerationDomainError::InvalidModerationTransition`] when
    /// the message is not pending.
    pub fn reject(&mut self, clock: &impl Clock) -> Result<(), ModerationDomainError> {
        self.transition(MessageModerationStatus::Rejected, clock)
    }

    fn transition(
        &mut self,
        to: MessageModerationStatus,
        clock: &impl Clock,
    ) -> Result<(), ModerationDomainError> {
        if !self.is_pending() {
            return Err(ModerationDomainError::InvalidModerationTransition {
                message_id: self.id,
                from: self.moderation_status,
                to,
            });
        }
        self.moderation_status = to;
        self.updated_at = clock.utc();
        Ok(())
    }
}
