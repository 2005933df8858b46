//! Message-level moderation service shared by posting, review and
//! guidelines operations.

use super::mail::MailTemplateError;
use crate::moderation::{
    config::ModerationConfig,
    domain::{
        Channel, ChannelId, ChannelMessage, EmailAddress, MessageId, ModerationDomainError,
        PartnerId, RuleSet, UserId,
    },
    ports::{
        ChannelMessageRepository, ChannelRepository, Directory, DirectoryError, MailRecipient,
        MailState, Mailer, MailerError, ModerationRepositoryError, ModerationRuleRepository,
        OutboundMail,
    },
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Service-level errors for message moderation.
#[derive(Debug, Error)]
pub enum ModerationServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ModerationDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ModerationRepositoryError),
    /// Directory lookup failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    /// The mail queue refused a mail.
    #[error(transparent)]
    Mailer(#[from] MailerError),
    /// A mail template failed to render.
    #[error(transparent)]
    Template(#[from] MailTemplateError),
    /// The channel does not exist.
    #[error("channel not found: {0}")]
    ChannelNotFound(ChannelId),
    /// The message does not exist.
    #[error("message not found: {0}")]
    MessageNotFound(MessageId),
    /// The user is unknown to the directory.
    #[error("unknown user: {0}")]
    UnknownUser(UserId),
    /// The partner is unknown to the directory.
    #[error("unknown partner: {0}")]
    UnknownPartner(PartnerId),
    /// The user does not moderate the channel.
    #[error("user {user_id} does not moderate channel {channel_id}")]
    NotModerator {
        /// Acting user.
        user_id: UserId,
        /// Channel the action targets.
        channel_id: ChannelId,
    },
}

/// Result type for message moderation operations.
pub type ModerationServiceResult<T> = Result<T, ModerationServiceError>;

/// Posting, review and guidelines operations on channel messages.
#[derive(Clone)]
pub struct ChannelModerationService<CR, RR, MR, D, M, C>
where
    CR: ChannelRepository,
    RR: ModerationRuleRepository,
    MR: ChannelMessageRepository,
    D: Directory,
    M: Mailer,
    C: Clock + Send + Sync,
{
    pub(super) channels: Arc<CR>,
    pub(super) rules: Arc<RR>,
    pub(super) messages: Arc<MR>,
    pub(super) directory: Arc<D>,
    pub(super) mailer: Arc<M>,
    pub(super) clock: Arc<C>,
    pub(super) config: ModerationConfig,
}

/// Port handles needed by [`ChannelModerationService`].
#[derive(Clone)]
pub struct ModerationPorts<CR, RR, MR, D, M> {
    /// Channel persistence.
    pub channels: Arc<CR>,
    /// Rule persistence.
    pub rules: Arc<RR>,
    /// Message persistence.
    pub messages: Arc<MR>,
    /// User and partner lookup.
    pub directory: Arc<D>,
    /// Outbound mail queue.
    pub mailer: Arc<M>,
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
    /// Creates a new moderation service with the default configuration.
    #[must_use]
    pub fn new(ports: ModerationPorts<CR, RR, MR, D, M>, clock: Arc<C>) -> Self {
        Self::with_config(ports, clock, ModerationConfig::default())
    }

    /// Creates a new moderation service with a custom configuration.
    #[must_use]
    pub fn with_config(
        ports: ModerationPorts<CR, RR, MR, D, M>,
        clock: Arc<C>,
        config: ModerationConfig,
    ) -> Self {
        let ModerationPorts {
            channels,
            rules,
            messages,
            directory,
            mailer,
        } = ports;
        Self {
            channels,
            rules,
            messages,
            directory,
            mailer,
            clock,
            config,
        }
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &ModerationConfig {
        &self.config
    }

    pub(super) async fn load_channel(&self, id: ChannelId) -> ModerationServiceResult<Channel> {
        self.channels
            .find_by_id(id)
            .await?
            .ok_or(ModerationServiceError::ChannelNotFound(id))
    }

    pub(super) async fn load_rules(&self, channel: &Channel) -> ModerationServiceResult<RuleSet> {
        let rules = self.rules.list_for_channel(channel.id()).await?;
        Ok(rules.iter().collect())
    }

    pub(super) fn ensure_moderator(
        channel: &Channel,
        user_id: UserId,
    ) -> ModerationServiceResult<()> {
        if channel.is_moderated_by(user_id) {
            return Ok(());
        }
        Err(ModerationServiceError::NotModerator {
            user_id,
            channel_id: channel.id(),
        })
    }

    /// Queues the mailing-list copy of an accepted message.
    ///
    /// Every member with an address except the author receives it. Returns
    /// the number of recipients; chat channels send nothing.
    pub(super) async fn fan_out(
        &self,
        channel: &Channel,
        message: &ChannelMessage,
    ) -> ModerationServiceResult<usize> {
        if !channel.email_send() {
            return Ok(0);
        }
        let author = message.author();
        let mut recipients = Vec::new();
        for &member in channel.members() {
            if author.partner_id() == Some(member) {
                continue;
            }
            let Some(email) = self.member_email(member).await? else {
                continue;
            };
            if author.email() == Some(&email) {
                continue;
            }
            recipients.push(MailRecipient {
                partner_id: Some(member),
                email,
            });
        }
        if recipients.is_empty() {
            debug!(channel_id = %channel.id(), "no mailing-list recipient");
            return Ok(0);
        }

        let count = recipients.len();
        let mail = OutboundMail {
            channel_id: channel.id(),
            author_id: author.partner_id(),
            email_from: self.sender_for(message).await?,
            recipients,
            subject: channel.name().to_owned(),
            body: message.body().to_owned(),
            state: MailState::Outgoing,
        };
        self.mailer.queue(&mail).await?;
        debug!(channel_id = %channel.id(), message_id = %message.id(), count, "message mailed");
        Ok(count)
    }

    pub(super) async fn member_email(
        &self,
        partner_id: PartnerId,
    ) -> ModerationServiceResult<Option<EmailAddress>> {
        Ok(self
            .directory
            .find_partner(partner_id)
            .await?
            .and_then(|partner| partner.email))
    }

    async fn sender_for(&self, message: &ChannelMessage) -> ModerationServiceResult<String> {
        let author = message.author();
        let Some(email) = author.email() else {
            return Ok(self.config.catchall_from.clone());
        };
        let name = match author.partner_id() {
            Some(partner_id) => self
                .directory
                .find_partner(partner_id)
                .await?
                .map(|partner| partner.name),
            None => None,
        };
        Ok(name.map_or_else(|| email.to_string(), |name| email.with_display_name(&name)))
    }
}
