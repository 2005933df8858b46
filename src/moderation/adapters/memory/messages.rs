//! In-memory channel message repository.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use super::poisoned;
use crate::moderation::{
    domain::{ChannelId, ChannelMessage, MessageId},
    ports::{ChannelMessageRepository, ModerationRepositoryError, ModerationRepositoryResult},
};

/// Thread-safe in-memory message repository preserving posting order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryChannelMessageRepository {
    messages: Arc<RwLock<Vec<ChannelMessage>>>,
}

impl InMemoryChannelMessageRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChannelMessageRepository for InMemoryChannelMessageRepository {
    async fn store(&self, message: &ChannelMessage) -> ModerationRepositoryResult<()> {
        let mut messages = self.messages.write().map_err(poisoned)?;
        if messages.iter().any(|m| m.id() == message.id()) {
            return Err(ModerationRepositoryError::DuplicateMessage(message.id()));
        }
        messages.push(message.clone());
        Ok(())
    }

    async fn update(&self, message: &ChannelMessage) -> ModerationRepositoryResult<()> {
        let mut messages = self.messages.write().map_err(poisoned)?;
        let slot = messages
            .iter_mut()
            .find(|m| m.id() == message.id())
            .ok_or(ModerationRepositoryError::MessageNotFound(message.id()))?;
        *slot = message.clone();
        Ok(())
    }

    async fn delete(&self, id: MessageId) -> ModerationRepositoryResult<()> {
        let mut messages = self.messages.write().map_err(poisoned)?;
        let before = messages.len();
        messages.retain(|m| m.id() != id);
        if messages.len() == before {
            return Err(ModerationRepositoryError::MessageNotFound(id));
        }
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: MessageId,
    ) -> ModerationRepositoryResult<Option<ChannelMessage>> {
        let messages = self.messages.read().map_err(poisoned)?;
        Ok(messages.iter().find(|m| m.id() == id).cloned())
    }

    async fn list_for_channel(
        &self,
        channel_id: ChannelId,
    ) -> ModerationRepositoryResult<Vec<ChannelMessage>> {
        let messages = self.messages.read().map_err(poisoned)?;
        Ok(messages
            .iter()
            .filter(|m| m.channel_id() == channel_id)
            .cloned()
            .collect())
    }

    async fn list_pending(
        &self,
        channel_id: ChannelId,
    ) -> ModerationRepositoryResult<Vec<ChannelMessage>> {
        let messages = self.messages.read().map_err(poisoned)?;
        Ok(messages
            .iter()
            .filter(|m| m.channel_id() == channel_id && m.is_pending())
            .cloned()
            .collect())
    }

    async fn count_pending(&self, channel_ids: &[ChannelId]) -> ModerationRepositoryResult<usize> {
        let messages = self.messages.read().map_err(poisoned)?;
        Ok(messages
            .iter()
            .filter(|m| m.is_pending() && channel_ids.contains(&m.channel_id()))
            .count())
    }
}
