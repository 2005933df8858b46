//! Channel administration: configuration writes, rule updates and counters.

use crate::moderation::{
    domain::{
        Actor, Channel, ChannelChange, ChannelConfigError, ChannelId, ChannelOperation,
        ChannelUpdate, EmailAddress, ModerationDomainError, ModerationRule, ModeratorCandidate,
        NewChannel, PartnerId, RuleStatus, UserId, evaluate_access,
    },
    ports::{
        ChannelMessageRepository, ChannelRepository, Directory, DirectoryError,
        ModerationRepositoryError, ModerationRuleRepository,
    },
};
use mockable::Clock;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Service-level errors for channel administration.
#[derive(Debug, Error)]
pub enum ChannelServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ModerationDomainError),
    /// The write would break a channel configuration invariant.
    #[error(transparent)]
    Config(#[from] ChannelConfigError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ModerationRepositoryError),
    /// Directory lookup failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    /// The channel does not exist.
    #[error("channel not found: {0}")]
    ChannelNotFound(ChannelId),
    /// The user is unknown to the directory.
    #[error("unknown user: {0}")]
    UnknownUser(UserId),
    /// The access policy denies the operation.
    #[error("user {user_id} may not {operation} this channel")]
    Unauthorized {
        /// Acting user.
        user_id: UserId,
        /// Denied operation.
        operation: ChannelOperation,
    },
}

/// Result type for channel administration operations.
pub type ChannelServiceResult<T> = Result<T, ChannelServiceError>;

/// Channel administration service.
#[derive(Clone)]
pub struct ChannelAdministrationService<CR, RR, MR, D, C>
where
    CR: ChannelRepository,
    RR: ModerationRuleRepository,
    MR: ChannelMessageRepository,
    D: Directory,
    C: Clock + Send + Sync,
{
    channels: Arc<CR>,
    rules: Arc<RR>,
    messages: Arc<MR>,
    directory: Arc<D>,
    clock: Arc<C>,
}

impl<CR, RR, MR, D, C> ChannelAdministrationService<CR, RR, MR, D, C>
where
    CR: ChannelRepository,
    RR: ModerationRuleRepository,
    MR: ChannelMessageRepository,
    D: Directory,
    C: Clock + Send + Sync,
{
    /// Creates a new channel administration service.
    #[must_use]
    pub const fn new(
        channels: Arc<CR>,
        rules: Arc<RR>,
        messages: Arc<MR>,
        directory: Arc<D>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            channels,
            rules,
            messages,
            directory,
            clock,
        }
    }

    /// Looks a user up in the directory and returns it as a moderator
    /// candidate.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelServiceError::UnknownUser`] when the directory does
    /// not know the user.
    pub async fn moderator_candidate(
        &self,
        user_id: UserId,
    ) -> ChannelServiceResult<ModeratorCandidate> {
        let profile = self
            .directory
            .find_user(user_id)
            .await?
            .ok_or(ChannelServiceError::UnknownUser(user_id))?;
        Ok(ModeratorCandidate {
            user_id,
            partner_id: profile.partner.id,
            email: profile.partner.email,
        })
    }

    /// Creates and stores a channel.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelServiceError::Config`] when the initial configuration
    /// is inconsistent, or [`ChannelServiceError::Repository`] when
    /// persistence fails.
    pub async fn create(&self, params: NewChannel) -> ChannelServiceResult<Channel> {
        let channel = Channel::create(params, &*self.clock)?;
        self.channels.store(&channel).await?;
        info!(channel_id = %channel.id(), name = channel.name(), "channel created");
        Ok(channel)
    }

    /// Finds a channel by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelServiceError::Repository`] when the lookup fails.
    pub async fn find(&self, id: ChannelId) -> ChannelServiceResult<Option<Channel>> {
        Ok(self.channels.find_by_id(id).await?)
    }

    /// Applies a batch of changes to a channel as one write.
    ///
    /// When the batch switches moderation off, every message of the channel
    /// still pending moderation is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelServiceError::Config`] when the resulting
    /// configuration is inconsistent; the stored channel is left unchanged.
    pub async fn update(
        &self,
        id: ChannelId,
        changes: impl IntoIterator<Item = ChannelChange> + Send,
    ) -> ChannelServiceResult<Channel> {
        let current = self.load(id).await?;
        self.apply_update(&current, changes.into_iter().collect()).await
    }

    /// Makes `user_id` a moderator of the channel, resolving the user
    /// through the directory.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelServiceError::UnknownUser`] for unknown users and
    /// [`ChannelServiceError::Config`] when the user has no email address or
    /// is not a member.
    pub async fn add_moderator(
        &self,
        id: ChannelId,
        user_id: UserId,
    ) -> ChannelServiceResult<Channel> {
        let candidate = self.moderator_candidate(user_id).await?;
        self.update(id, [ChannelChange::AddModerator(candidate)]).await
    }

    /// Deletes a channel.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelServiceError::Repository`] when the channel does not
    /// exist or persistence fails.
    pub async fn delete(&self, id: ChannelId) -> ChannelServiceResult<()> {
        self.channels.delete(id).await?;
        info!(channel_id = %id, "channel deleted");
        Ok(())
    }

    /// Sets the moderation status of a batch of addresses on a channel.
    ///
    /// Addresses are normalised and deduplicated before the upsert; other
    /// addresses keep their rules. Returns the resulting rules of the listed
    /// addresses.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelServiceError::Domain`] when an address is invalid,
    /// [`ChannelServiceError::ChannelNotFound`] for unknown channels, or
    /// [`ChannelServiceError::Repository`] when the upsert fails.
    pub async fn update_moderation<I, S>(
        &self,
        id: ChannelId,
        addresses: I,
        status: RuleStatus,
    ) -> ChannelServiceResult<Vec<ModerationRule>>
    where
        I: IntoIterator<Item = S> + Send,
        S: AsRef<str>,
    {
        let emails = normalise_addresses(addresses)?;
        let channel = self.load(id).await?;
        if emails.is_empty() {
            return Ok(Vec::new());
        }
        let rules = self
            .rules
            .upsert(channel.id(), &emails, status, self.clock.utc())
            .await?;
        info!(
            channel_id = %channel.id(),
            status = %status,
            count = rules.len(),
            "moderation rules updated"
        );
        Ok(rules)
    }

    /// Returns every moderation rule of a channel.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelServiceError::Repository`] when the lookup fails.
    pub async fn rules(&self, id: ChannelId) -> ChannelServiceResult<Vec<ModerationRule>> {
        Ok(self.rules.list_for_channel(id).await?)
    }

    /// Returns the number of moderation rules of a channel.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelServiceError::Repository`] when the count fails.
    pub async fn moderation_count(&self, id: ChannelId) -> ChannelServiceResult<usize> {
        Ok(self.rules.count_for_channel(id).await?)
    }

    /// Returns the number of messages of a channel waiting for review.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelServiceError::Repository`] when the count fails.
    pub async fn pending_count(&self, id: ChannelId) -> ChannelServiceResult<usize> {
        Ok(self.messages.count_pending(&[id]).await?)
    }

    /// Returns the number of pending messages across every channel the user
    /// moderates.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelServiceError::Repository`] when a query fails.
    pub async fn moderation_counter(&self, user_id: UserId) -> ChannelServiceResult<usize> {
        let channel_ids: Vec<ChannelId> = self
            .channels
            .list_moderated_by(user_id)
            .await?
            .iter()
            .map(Channel::id)
            .collect();
        if channel_ids.is_empty() {
            return Ok(0);
        }
        Ok(self.messages.count_pending(&channel_ids).await?)
    }

    /// Returns `true` when the user moderates at least one channel.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelServiceError::Repository`] when the query fails.
    pub async fn is_moderator(&self, user_id: UserId) -> ChannelServiceResult<bool> {
        Ok(!self.channels.list_moderated_by(user_id).await?.is_empty())
    }

    /// Creates a channel on behalf of `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelServiceError::Unauthorized`] when the actor may not
    /// create channels, plus every error of [`Self::create`].
    pub async fn create_as(
        &self,
        actor: &Actor,
        params: NewChannel,
    ) -> ChannelServiceResult<Channel> {
        let channel = Channel::create(params, &*self.clock)?;
        authorize(actor, &channel, ChannelOperation::Create)?;
        self.channels.store(&channel).await?;
        info!(channel_id = %channel.id(), user_id = %actor.user_id(), "channel created");
        Ok(channel)
    }

    /// Reads a channel on behalf of `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelServiceError::Unauthorized`] when the channel is not
    /// visible to the actor.
    pub async fn find_as(&self, actor: &Actor, id: ChannelId) -> ChannelServiceResult<Channel> {
        let channel = self.load(id).await?;
        authorize(actor, &channel, ChannelOperation::Read)?;
        Ok(channel)
    }

    /// Updates a channel on behalf of `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelServiceError::Unauthorized`] when the actor may not
    /// write the channel, plus every error of [`Self::update`].
    pub async fn update_as(
        &self,
        actor: &Actor,
        id: ChannelId,
        changes: impl IntoIterator<Item = ChannelChange> + Send,
    ) -> ChannelServiceResult<Channel> {
        let current = self.load(id).await?;
        authorize(actor, &current, ChannelOperation::Write)?;
        self.apply_update(&current, changes.into_iter().collect()).await
    }

    /// Deletes a channel on behalf of `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelServiceError::Unauthorized`] when the actor may not
    /// delete the channel.
    pub async fn delete_as(&self, actor: &Actor, id: ChannelId) -> ChannelServiceResult<()> {
        let channel = self.load(id).await?;
        authorize(actor, &channel, ChannelOperation::Delete)?;
        self.delete(id).await
    }

    /// Lists the member partners of a channel on behalf of `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelServiceError::Unauthorized`] when the actor may not
    /// read the member list.
    pub async fn members_as(
        &self,
        actor: &Actor,
        id: ChannelId,
    ) -> ChannelServiceResult<BTreeSet<PartnerId>> {
        let channel = self.load(id).await?;
        authorize(actor, &channel, ChannelOperation::ReadMembers)?;
        Ok(channel.members().clone())
    }

    async fn load(&self, id: ChannelId) -> ChannelServiceResult<Channel> {
        self.channels
            .find_by_id(id)
            .await?
            .ok_or(ChannelServiceError::ChannelNotFound(id))
    }

    async fn apply_update(
        &self,
        current: &Channel,
        changes: Vec<ChannelChange>,
    ) -> ChannelServiceResult<Channel> {
        let ChannelUpdate {
            channel,
            moderation_disabled,
        } = current.apply(changes, &*self.clock)?;
        self.channels.update(&channel).await?;

        // Any write to an unmoderated channel also sweeps messages a failed
        // release left pending.
        if !channel.moderation() {
            let released = self.release_pending(channel.id()).await?;
            if moderation_disabled || released > 0 {
                info!(
                    channel_id = %channel.id(),
                    released,
                    "moderation disabled, pending messages accepted"
                );
            }
        }
        Ok(channel)
    }

    async fn release_pending(&self, id: ChannelId) -> ChannelServiceResult<usize> {
        let pending = self.messages.list_pending(id).await?;
        let count = pending.len();
        for mut message in pending {
            message.accept(&*self.clock)?;
            self.messages.update(&message).await?;
        }
        Ok(count)
    }
}

fn authorize(
    actor: &Actor,
    channel: &Channel,
    operation: ChannelOperation,
) -> ChannelServiceResult<()> {
    if evaluate_access(actor, channel, operation).is_allowed() {
        return Ok(());
    }
    debug!(
        user_id = %actor.user_id(),
        channel_id = %channel.id(),
        operation = %operation,
        "channel access denied"
    );
    Err(ChannelServiceError::Unauthorized {
        user_id: actor.user_id(),
        operation,
    })
}

fn normalise_addresses<I, S>(addresses: I) -> Result<Vec<EmailAddress>, ModerationDomainError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut emails = Vec::new();
    for address in addresses {
        let email = EmailAddress::parse(address)?;
        if seen.insert(email.clone()) {
            emails.push(email);
        }
    }
    Ok(emails)
}
