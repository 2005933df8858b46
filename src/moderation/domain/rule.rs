//! Per-channel allow/ban rules keyed by author email address.

use super::{ChannelId, EmailAddress, ParseRuleStatusError, RuleId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Moderation status applied to an email address on a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleStatus {
    /// Messages from the address bypass moderation.
    Allow,
    /// Messages from the address are discarded.
    Ban,
}

impl RuleStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Ban => "ban",
        }
    }
}

impl fmt::Display for RuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for RuleStatus {
    type Error = ParseRuleStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "allow" => Ok(Self::Allow),
            "ban" => Ok(Self::Ban),
            _ => Err(ParseRuleStatusError(value.to_owned())),
        }
    }
}

/// Moderation rule for one `(channel, email)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationRule {
    id: RuleId,
    channel_id: ChannelId,
    email: EmailAddress,
    status: RuleStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted moderation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedRuleData {
    /// Persisted rule identifier.
    pub id: RuleId,
    /// Persisted channel identifier.
    pub channel_id: ChannelId,
    /// Persisted email address.
    pub email: EmailAddress,
    /// Persisted rule status.
    pub status: RuleStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl ModerationRule {
    /// Creates a new rule.
    #[must_use]
    pub fn new(
        channel_id: ChannelId,
        email: EmailAddress,
        status: RuleStatus,
        clock: &impl Clock,
    ) -> Self {
        Self::new_at(channel_id, email, status, clock.utc())
    }

    /// Creates a new rule stamped with an explicit time.
    #[must_use]
    pub fn new_at(
        channel_id: ChannelId,
        email: EmailAddress,
        status: RuleStatus,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RuleId::new(),
            channel_id,
            email,
            status,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a rule from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedRuleData) -> Self {
        Self {
            id: data.id,
            channel_id: data.channel_id,
            email: data.email,
            status: data.status,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the rule identifier.
    #[must_use]
    pub const fn id(&self) -> RuleId {
        self.id
    }

    /// Returns the channel the rule applies to.
    #[must_use]
    pub const fn channel_id(&self) -> ChannelId {
        self.channel_id
    }

    /// Returns the email address the rule applies to.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the rule status.
    #[must_use]
    pub const fn status(&self) -> RuleStatus {
        self.status
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

    /// Applies a status, returning `true` when the rule changed.
    ///
    /// Re-applying the current status leaves the rule untouched.
    pub fn apply_status(&mut self, status: RuleStatus, clock: &impl Clock) -> bool {
        self.apply_status_at(status, clock.utc())
    }

    /// Applies a status stamped with an explicit time.
    ///
    /// Used by repositories applying a batch upsert under a single timestamp.
    pub fn apply_status_at(&mut self, status: RuleStatus, timestamp: DateTime<Utc>) -> bool {
        if self.status == status {
            return false;
        }
        self.status = status;
        self.updated_at = timestamp;
        true
    }
}

/// Lookup view over the rules of a single channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    statuses: HashMap<EmailAddress, RuleStatus>,
}

impl RuleSet {
    /// Creates an empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the status for an address, if any rule exists.
    #[must_use]
    pub fn status_of(&self, email: &EmailAddress) -> Option<RuleStatus> {
        self.statuses.get(email).copied()
    }

    /// Returns `true` when the address is banned.
    #[must_use]
    pub fn is_banned(&self, email: &EmailAddress) -> bool {
        self.status_of(email) == Some(RuleStatus::Ban)
    }

    /// Returns `true` when the address is explicitly allowed.
    #[must_use]
    pub fn is_allowed(&self, email: &EmailAddress) -> bool {
        self.status_of(email) == Some(RuleStatus::Allow)
    }

    /// Returns the number of addresses covered by the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    /// Returns `true` when the set holds no rule.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}

impl<'a> FromIterator<&'a ModerationRule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = &'a ModerationRule>>(iter: I) -> Self {
        let statuses = iter
            .into_iter()
            .map(|rule| (rule.email().clone(), rule.status()))
            .collect();
        Self { statuses }
    }
}

impl FromIterator<(EmailAddress, RuleStatus)> for RuleSet {
    fn from_iter<I: IntoIterator<Item = (EmailAddress, RuleStatus)>>(iter: I) -> Self {
        Self {
            statuses: iter.into_iter().collect(),
        }
    }
}
