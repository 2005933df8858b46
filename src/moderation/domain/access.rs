//! Channel access policy.
//!
//! Access decisions are a pure function of the acting user, the channel and
//! the requested operation; nothing here touches persistence.

use super::{Channel, PartnerId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Named group of users a channel can be restricted to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessGroup(String);

impl AccessGroup {
    /// Creates a group name, trimmed and lowercased.
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_ascii_lowercase())
    }

    /// Returns the group name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccessGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who may see a channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "group", rename_all = "snake_case")]
pub enum ChannelVisibility {
    /// Anyone may read the channel.
    Public,
    /// Members of the group, and channel members, may read the channel.
    Group(AccessGroup),
    /// Only channel members may read the channel.
    Private,
}

/// Kind of account performing an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    /// Anonymous or website visitor account.
    Public,
    /// External customer or supplier account.
    Portal,
    /// Employee account.
    Internal,
}

/// The user performing a channel operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    user_id: UserId,
    partner_id: PartnerId,
    kind: ActorKind,
    groups: BTreeSet<AccessGroup>,
}

impl Actor {
    /// Creates an actor without group memberships.
    #[must_use]
    pub const fn new(user_id: UserId, partner_id: PartnerId, kind: ActorKind) -> Self {
        Self {
            user_id,
            partner_id,
            kind,
            groups: BTreeSet::new(),
        }
    }

    /// Adds a group membership.
    #[must_use]
    pub fn with_group(mut self, group: AccessGroup) -> Self {
        self.groups.insert(group);
        self
    }

    /// Returns the acting user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the partner linked to the acting user.
    #[must_use]
    pub const fn partner_id(&self) -> PartnerId {
        self.partner_id
    }

    /// Returns the account kind.
    #[must_use]
    pub const fn kind(&self) -> ActorKind {
        self.kind
    }

    /// Returns `true` when the actor belongs to the group.
    #[must_use]
    pub fn in_group(&self, group: &AccessGroup) -> bool {
        self.groups.contains(group)
    }
}

/// Operation requested on a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelOperation {
    /// Read the channel and its messages.
    Read,
    /// Create a channel.
    Create,
    /// Modify the channel.
    Write,
    /// Delete the channel.
    Delete,
    /// List the channel's member partners.
    ReadMembers,
}

impl ChannelOperation {
    /// Returns a stable name for logs and errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Create => "create",
            Self::Write => "write",
            Self::Delete => "delete",
            Self::ReadMembers => "read_members",
        }
    }
}

impl fmt::Display for ChannelOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// The operation is permitted.
    Allow,
    /// The operation is refused.
    Deny,
}

impl AccessDecision {
    /// Returns `true` for [`AccessDecision::Allow`].
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }

    const fn from_bool(allowed: bool) -> Self {
        if allowed { Self::Allow } else { Self::Deny }
    }
}

/// Evaluates whether `actor` may perform `operation` on `channel`.
///
/// For [`ChannelOperation::Create`] the channel is the one about to be
/// created; only the actor kind matters.
#[must_use]
pub fn evaluate_access(
    actor: &Actor,
    channel: &Channel,
    operation: ChannelOperation,
) -> AccessDecision {
    let internal = actor.kind() == ActorKind::Internal;
    let allowed = match operation {
        ChannelOperation::Read => can_read(actor, channel),
        ChannelOperation::Create => internal,
        ChannelOperation::Write | ChannelOperation::Delete | ChannelOperation::ReadMembers => {
            internal && can_read(actor, channel)
        }
    };
    AccessDecision::from_bool(allowed)
}

fn can_read(actor: &Actor, channel: &Channel) -> bool {
    let member = channel.is_member(actor.partner_id());
    match channel.visibility() {
        ChannelVisibility::Public => true,
        ChannelVisibility::Group(group) => member || actor.in_group(group),
        ChannelVisibility::Private => member,
    }
}
