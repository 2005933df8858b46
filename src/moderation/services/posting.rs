//! Posting messages through the moderation gate.

use super::moderation::{ChannelModerationService, ModerationServiceError, ModerationServiceResult};
use crate::moderation::{
    domain::{
        ChannelId, ChannelMessage, EmailAddress, GateDecision, MessageAuthor, MessageKind,
        NewChannelMessage, PartnerId, RuleSet, evaluate_message,
    },
    ports::{
        ChannelMessageRepository, ChannelRepository, Directory, Mailer, ModerationRuleRepository,
    },
};
use mockable::Clock;
use tracing::{debug, warn};

/// Who is posting a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostAuthor {
    /// A partner known to the directory.
    Partner(PartnerId),
    /// A sender only known by address, as received through the mail gateway.
    Email(String),
    /// The system itself.
    System,
}

/// Request payload for posting a message on a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostMessageRequest {
    author: PostAuthor,
    kind: MessageKind,
    body: String,
}

impl PostMessageRequest {
    /// A comment posted by a known partner.
    #[must_use]
    pub fn from_partner(partner_id: PartnerId, body: impl Into<String>) -> Self {
        Self {
            author: PostAuthor::Partner(partner_id),
            kind: MessageKind::Comment,
            body: body.into(),
        }
    }

    /// A mail received from `address`, which may use the display form
    /// `"Name" <address>`.
    #[must_use]
    pub fn from_email(address: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            author: PostAuthor::Email(address.into()),
            kind: MessageKind::Email,
            body: body.into(),
        }
    }

    /// A system notification.
    #[must_use]
    pub fn notification(body: impl Into<String>) -> Self {
        Self {
            author: PostAuthor::System,
            kind: MessageKind::Notification,
            body: body.into(),
        }
    }

    /// Overrides the message kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: MessageKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Outcome of posting a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostOutcome {
    /// The message is visible on the channel.
    Accepted(ChannelMessage),
    /// The message waits for a moderator.
    PendingModeration(ChannelMessage),
    /// The message was dropped because its author is banned.
    Discarded,
}

impl PostOutcome {
    /// Returns the stored message, if any.
    #[must_use]
    pub const fn message(&self) -> Option<&ChannelMessage> {
        match self {
            Self::Accepted(message) | Self::PendingModeration(message) => Some(message),
            Self::Discarded => None,
        }
    }
}

impl<CR, RR, MR, D, M, C> ChannelModerationService<CR, RR, MR, D, M, C>
where
    CR: ChannelRepository,
    RR: ModerationRuleRepository,
    MR: ChannelMessageRepository,
    D: Directory,
    M: Mailer,
    C: Clock + Send + Sync,
{
    /// Posts a message on a channel.
    ///
    /// The moderation gate decides whether the message is delivered, held
    /// for review or discarded. Delivered messages on mailing-list channels
    /// are mailed to the members; mail failures are logged and do not fail
    /// the post.
    ///
    /// # Errors
    ///
    /// Returns [`ModerationServiceError::ChannelNotFound`] for unknown
    /// channels, [`ModerationServiceError::UnknownPartner`] for unknown
    /// authors, [`ModerationServiceError::Domain`] for malformed addresses,
    /// or a repository error when persistence fails.
    pub async fn post(
        &self,
        channel_id: ChannelId,
        request: PostMessageRequest,
    ) -> ModerationServiceResult<PostOutcome> {
        let PostMessageRequest {
            author: requested_by,
            kind,
            body,
        } = request;
        let channel = self.load_channel(channel_id).await?;
        let author = self.resolve_author(requested_by).await?;

        let is_moderator = author.is_system()
            || channel.has_moderator_identity(author.partner_id(), author.email());
        let rules = if channel.moderation() {
            self.load_rules(&channel).await?
        } else {
            RuleSet::new()
        };
        let decision = evaluate_message(&channel, &rules, author.email(), is_moderator);
        debug!(
            channel_id = %channel_id,
            author = author.email().map(EmailAddress::as_str),
            ?decision,
            "moderation gate evaluated"
        );

        let Some(status) = decision.initial_status() else {
            return Ok(PostOutcome::Discarded);
        };
        let message = ChannelMessage::new(
            NewChannelMessage {
                channel_id,
                author,
                kind,
                body,
                moderation_status: status,
            },
            &*self.clock,
        );
        self.messages.store(&message).await?;

        if decision == GateDecision::HoldForModeration {
            return Ok(PostOutcome::PendingModeration(message));
        }
        if let Err(err) = self.fan_out(&channel, &message).await {
            warn!(
                channel_id = %channel_id,
                message_id = %message.id(),
                error = %err,
                "mailing-list delivery failed"
            );
        }
        Ok(PostOutcome::Accepted(message))
    }

    async fn resolve_author(&self, author: PostAuthor) -> ModerationServiceResult<MessageAuthor> {
        match author {
            PostAuthor::Partner(partner_id) => {
                let partner = self
                    .directory
                    .find_partner(partner_id)
                    .await?
                    .ok_or(ModerationServiceError::UnknownPartner(partner_id))?;
                Ok(MessageAuthor::partner(partner_id, partner.email))
            }
            PostAuthor::Email(address) => {
                Ok(MessageAuthor::external(EmailAddress::parse(address)?))
            }
            PostAuthor::System => Ok(MessageAuthor::system()),
        }
    }
}
