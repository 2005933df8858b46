//! Repository ports for channels, moderation rules and channel messages.

use crate::moderation::domain::{
    Channel, ChannelId, ChannelMessage, EmailAddress, MessageId, ModerationRule, RuleStatus,
    UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for moderation repository operations.
pub type ModerationRepositoryResult<T> = Result<T, ModerationRepositoryError>;

/// Channel persistence contract.
#[async_trait]
pub trait ChannelRepository: Send + Sync {
    /// Stores a new channel.
    ///
    /// # Errors
    ///
    /// Returns [`ModerationRepositoryError::DuplicateChannel`] when the
    /// channel already exists.
    async fn store(&self, channel: &Channel) -> ModerationRepositoryResult<()>;

    /// Persists changes to an existing channel.
    ///
    /// # Errors
    ///
    /// Returns [`ModerationRepositoryError::ChannelNotFound`] when the
    /// channel does not exist.
    async fn update(&self, channel: &Channel) -> ModerationRepositoryResult<()>;

    /// Deletes a channel.
    ///
    /// # Errors
    ///
    /// Returns [`ModerationRepositoryError::ChannelNotFound`] when the
    /// channel does not exist.
    async fn delete(&self, id: ChannelId) -> ModerationRepositoryResult<()>;

    /// Finds a channel by identifier.
    ///
    /// Returns `None` when the channel does not exist.
    async fn find_by_id(&self, id: ChannelId) -> ModerationRepositoryResult<Option<Channel>>;

    /// Returns every channel the user moderates.
    async fn list_moderated_by(&self, user_id: UserId) -> ModerationRepositoryResult<Vec<Channel>>;
}

/// Moderation rule persistence contract.
#[async_trait]
pub trait ModerationRuleRepository: Send + Sync {
    /// Creates or overwrites the rule of every address with `status`.
    ///
    /// The whole batch is applied atomically; addresses not listed keep
    /// their rules. Re-applying an existing status leaves that rule
    /// untouched. Returns the rules of the listed addresses after the
    /// upsert.
    async fn upsert(
        &self,
        channel_id: ChannelId,
        emails: &[EmailAddress],
        status: RuleStatus,
        timestamp: DateTime<Utc>,
    ) -> ModerationRepositoryResult<Vec<ModerationRule>>;

    /// Returns every rule of a channel.
    async fn list_for_channel(
        &self,
        channel_id: ChannelId,
    ) -> ModerationRepositoryResult<Vec<ModerationRule>>;

    /// Returns the number of rules of a channel.
    async fn count_for_channel(&self, channel_id: ChannelId) -> ModerationRepositoryResult<usize>;
}

/// Channel message persistence contract.
#[async_trait]
pub trait ChannelMessageRepository: Send + Sync {
    /// Stores a new message.
    ///
    /// # Errors
    ///
    /// Returns [`ModerationRepositoryError::DuplicateMessage`] when the
    /// message already exists.
    async fn store(&self, message: &ChannelMessage) -> ModerationRepositoryResult<()>;

    /// Persists a message status change.
    ///
    /// # Errors
    ///
    /// Returns [`ModerationRepositoryError::MessageNotFound`] when the
    /// message does not exist.
    async fn update(&self, message: &ChannelMessage) -> ModerationRepositoryResult<()>;

    /// Removes a message.
    ///
    /// # Errors
    ///
    /// Returns [`ModerationRepositoryError::MessageNotFound`] when the
    /// message does not exist.
    async fn delete(&self, id: MessageId) -> ModerationRepositoryResult<()>;

    /// Finds a message by identifier.
    async fn find_by_id(&self, id: MessageId) -> ModerationRepositoryResult<Option<ChannelMessage>>;

    /// Returns every message of a channel in posting order.
    async fn list_for_channel(
        &self,
        channel_id: ChannelId,
    ) -> ModerationRepositoryResult<Vec<ChannelMessage>>;

    /// Returns the pending messages of a channel in posting order.
    async fn list_pending(
        &self,
        channel_id: ChannelId,
    ) -> ModerationRepositoryResult<Vec<ChannelMessage>>;

    /// Counts pending messages across the given channels.
    async fn count_pending(&self, channel_ids: &[ChannelId]) -> ModerationRepositoryResult<usize>;
}

/// Errors returned by moderation repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ModerationRepositoryError {
    /// A channel with the same identifier already exists.
    #[error("duplicate channel identifier: {0}")]
    DuplicateChannel(ChannelId),

    /// The channel was not found.
    #[error("channel not found: {0}")]
    ChannelNotFound(ChannelId),

    /// A message with the same identifier already exists.
    #[error("duplicate message identifier: {0}")]
    DuplicateMessage(MessageId),

    /// The message was not found.
    #[error("message not found: {0}")]
    MessageNotFound(MessageId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ModerationRepositoryError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
