//! In-memory channel repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::poisoned;
use crate::moderation::{
    domain::{Channel, ChannelId, UserId},
    ports::{ChannelRepository, ModerationRepositoryError, ModerationRepositoryResult},
};

/// Thread-safe in-memory channel repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryChannelRepository {
    channels: Arc<RwLock<HashMap<ChannelId, Channel>>>,
}

impl InMemoryChannelRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChannelRepository for InMemoryChannelRepository {
    async fn store(&self, channel: &Channel) -> ModerationRepositoryResult<()> {
        let mut channels = self.channels.write().map_err(poisoned)?;
        if channels.contains_key(&channel.id()) {
            return Err(ModerationRepositoryError::DuplicateChannel(channel.id()));
        }
        channels.insert(channel.id(), channel.clone());
        Ok(())
    }

    async fn update(&self, channel: &Channel) -> ModerationRepositoryResult<()> {
        let mut channels = self.channels.write().map_err(poisoned)?;
        let slot = channels
            .get_mut(&channel.id())
            .ok_or(ModerationRepositoryError::ChannelNotFound(channel.id()))?;
        *slot = channel.clone();
        Ok(())
    }

    async fn delete(&self, id: ChannelId) -> ModerationRepositoryResult<()> {
        let mut channels = self.channels.write().map_err(poisoned)?;
        channels
            .remove(&id)
            .map(|_| ())
            .ok_or(ModerationRepositoryError::ChannelNotFound(id))
    }

    async fn find_by_id(&self, id: ChannelId) -> ModerationRepositoryResult<Option<Channel>> {
        let channels = self.channels.read().map_err(poisoned)?;
        Ok(channels.get(&id).cloned())
    }

    async fn list_moderated_by(&self, user_id: UserId) -> ModerationRepositoryResult<Vec<Channel>> {
        let channels = self.channels.read().map_err(poisoned)?;
        Ok(channels
            .values()
            .filter(|channel| channel.is_moderated_by(user_id))
            .cloned()
            .collect())
    }
}
