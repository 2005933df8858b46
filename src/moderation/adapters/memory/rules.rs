//! In-memory moderation rule repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::poisoned;
use crate::moderation::{
    domain::{ChannelId, EmailAddress, ModerationRule, RuleStatus},
    ports::{ModerationRepositoryResult, ModerationRuleRepository},
};

type RuleKey = (ChannelId, EmailAddress);

/// Thread-safe in-memory moderation rule repository.
///
/// The whole upsert batch runs under one write lock, which gives the
/// atomicity the port requires.
#[derive(Debug, Clone, Default)]
pub struct InMemoryModerationRuleRepository {
    rules: Arc<RwLock<HashMap<RuleKey, ModerationRule>>>,
}

impl InMemoryModerationRuleRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ModerationRuleRepository for InMemoryModerationRuleRepository {
    async fn upsert(
        &self,
        channel_id: ChannelId,
        emails: &[EmailAddress],
        status: RuleStatus,
        timestamp: DateTime<Utc>,
    ) -> ModerationRepositoryResult<Vec<ModerationRule>> {
        let mut rules = self.rules.write().map_err(poisoned)?;
        let mut touched = Vec::with_capacity(emails.len());
        for email in emails {
            let rule = rules
                .entry((channel_id, email.clone()))
                .and_modify(|rule| {
                    rule.apply_status_at(status, timestamp);
                })
                .or_insert_with(|| {
                    ModerationRule::new_at(channel_id, email.clone(), status, timestamp)
                });
            touched.push(rule.clone());
        }
        Ok(touched)
    }

    async fn list_for_channel(
        &self,
        channel_id: ChannelId,
    ) -> ModerationRepositoryResult<Vec<ModerationRule>> {
        let rules = self.rules.read().map_err(poisoned)?;
        let mut found: Vec<ModerationRule> = rules
            .values()
            .filter(|rule| rule.channel_id() == channel_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.email().cmp(b.email()));
        Ok(found)
    }

    async fn count_for_channel(&self, channel_id: ChannelId) -> ModerationRepositoryResult<usize> {
        let rules = self.rules.read().map_err(poisoned)?;
        Ok(rules.keys().filter(|(id, _)| *id == channel_id).count())
    }
}
