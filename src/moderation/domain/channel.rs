//! Channel aggregate root with moderation configuration.

use super::{
    ChannelConfigError, ChannelId, ChannelVisibility, EmailAddress, ModerationDomainError,
    PartnerId, UserId,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A user moderating a channel, with the contact details moderation needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Moderator {
    user_id: UserId,
    partner_id: PartnerId,
    email: EmailAddress,
}

impl Moderator {
    /// Returns the moderating user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the partner linked to the moderating user.
    #[must_use]
    pub const fn partner_id(&self) -> PartnerId {
        self.partner_id
    }

    /// Returns the moderator's email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }
}

/// Directory data for a user about to become moderator.
///
/// The email is optional here because the directory may hold users without
/// one; such candidates are rejected when applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeratorCandidate {
    /// Candidate user.
    pub user_id: UserId,
    /// Partner linked to the candidate user.
    pub partner_id: PartnerId,
    /// Candidate email address, if the directory knows one.
    pub email: Option<EmailAddress>,
}

/// A single configuration change applied to a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelChange {
    /// Renames the channel.
    Rename(String),
    /// Replaces the channel description.
    SetDescription(Option<String>),
    /// Replaces the visibility policy.
    SetVisibility(ChannelVisibility),
    /// Toggles mailing-list delivery.
    SetEmailSend(bool),
    /// Toggles moderation.
    SetModeration(bool),
    /// Replaces the guidelines text sent to members.
    SetGuidelines(Option<String>),
    /// Adds a member.
    AddMember(PartnerId),
    /// Removes a member.
    RemoveMember(PartnerId),
    /// Adds a moderator.
    AddModerator(ModeratorCandidate),
    /// Removes a moderator.
    RemoveModerator(UserId),
    /// Removes every moderator.
    ClearModerators,
}

/// Parameters for creating a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChannel {
    name: String,
    description: Option<String>,
    visibility: ChannelVisibility,
    email_send: bool,
    moderation: bool,
    members: Vec<PartnerId>,
    moderators: Vec<ModeratorCandidate>,
}

impl NewChannel {
    /// Starts a public chat channel with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            visibility: ChannelVisibility::Public,
            email_send: false,
            moderation: false,
            members: Vec::new(),
            moderators: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the visibility policy.
    #[must_use]
    pub fn with_visibility(mut self, visibility: ChannelVisibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Turns the channel into a mailing list.
    #[must_use]
    pub const fn with_email_send(mut self, email_send: bool) -> Self {
        self.email_send = email_send;
        self
    }

    /// Enables moderation.
    #[must_use]
    pub const fn with_moderation(mut self, moderation: bool) -> Self {
        self.moderation = moderation;
        self
    }

    /// Adds initial members.
    #[must_use]
    pub fn with_members(mut self, members: impl IntoIterator<Item = PartnerId>) -> Self {
        self.members.extend(members);
        self
    }

    /// Adds an initial moderator.
    #[must_use]
    pub fn with_moderator(mut self, candidate: ModeratorCandidate) -> Self {
        self.moderators.push(candidate);
        self
    }
}

/// Result of applying changes to a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelUpdate {
    /// The channel after the changes.
    pub channel: Channel,
    /// `true` when the changes switched moderation off.
    pub moderation_disabled: bool,
}

/// Discussion channel aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    id: ChannelId,
    name: String,
    description: Option<String>,
    visibility: ChannelVisibility,
    email_send: bool,
    moderation: bool,
    guidelines: Option<String>,
    members: BTreeSet<PartnerId>,
    moderators: BTreeMap<UserId, Moderator>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Channel {
    /// Creates a channel, enforcing every configuration invariant.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelConfigError`] when the initial configuration breaks a
    /// moderation invariant or the name is empty.
    pub fn create(params: NewChannel, clock: &impl Clock) -> Result<Self, ChannelConfigError> {
        let timestamp = clock.utc();
        let NewChannel {
            name,
            description,
            visibility,
            email_send,
            moderation,
            members,
            moderators,
        } = params;

        let mut channel = Self {
            id: ChannelId::new(),
            name: validate_name(name)?,
            description,
            visibility,
            email_send,
            moderation,
            guidelines: None,
            members: members.into_iter().collect(),
            moderators: BTreeMap::new(),
            created_at: timestamp,
            updated_at: timestamp,
        };
        for candidate in moderators {
            channel.add_moderator(candidate)?;
        }
        channel.check_invariants()?;
        Ok(channel)
    }

    /// Applies a batch of changes as one write.
    ///
    /// Invariants are checked once all changes are applied, so a batch may
    /// add a member and make it moderator in one go.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelConfigError`] when any change or the resulting
    /// configuration is invalid; `self` is left untouched.
    pub fn apply(
        &self,
        changes: impl IntoIterator<Item = ChannelChange>,
        clock: &impl Clock,
    ) -> Result<ChannelUpdate, ChannelConfigError> {
        let mut next = self.clone();
        for change in changes {
            next.apply_one(change)?;
        }
        next.check_invariants()?;
        next.updated_at = clock.utc();
        let moderation_disabled = self.moderation && !next.moderation;
        Ok(ChannelUpdate {
            channel: next,
            moderation_disabled,
        })
    }

    fn apply_one(&mut self, change: ChannelChange) -> Result<(), ChannelConfigError> {
        match change {
            ChannelChange::Rename(name) => self.name = validate_name(name)?,
            ChannelChange::SetDescription(description) => self.description = description,
            ChannelChange::SetVisibility(visibility) => self.visibility = visibility,
            ChannelChange::SetEmailSend(email_send) => self.email_send = email_send,
            ChannelChange::SetModeration(moderation) => self.moderation = moderation,
            ChannelChange::SetGuidelines(guidelines) => self.guidelines = guidelines,
            ChannelChange::AddMember(partner_id) => {
                self.members.insert(partner_id);
            }
            ChannelChange::RemoveMember(partner_id) => {
                if self.moderators.values().any(|m| m.partner_id == partner_id) {
                    return Err(ChannelConfigError::MemberIsModerator(partner_id));
                }
                self.members.remove(&partner_id);
            }
            ChannelChange::AddModerator(candidate) => self.add_moderator(candidate)?,
            ChannelChange::RemoveModerator(user_id) => {
                self.moderators.remove(&user_id);
            }
            ChannelChange::ClearModerators => self.moderators.clear(),
        }
        Ok(())
    }

    fn add_moderator(&mut self, candidate: ModeratorCandidate) -> Result<(), ChannelConfigError> {
        let ModeratorCandidate {
            user_id,
            partner_id,
            email,
        } = candidate;
        let address = email.ok_or(ChannelConfigError::ModeratorWithoutEmail(user_id))?;
        self.moderators.insert(
            user_id,
            Moderator {
                user_id,
                partner_id,
                email: address,
            },
        );
        Ok(())
    }

    fn check_invariants(&self) -> Result<(), ChannelConfigError> {
        if self.moderation && !self.email_send {
            return Err(ChannelConfigError::ModerationRequiresMailingList);
        }
        if self.moderation && self.moderators.is_empty() {
            return Err(ChannelConfigError::ModerationWithoutModerators);
        }
        if let Some(outsider) = self
            .moderators
            .values()
            .find(|m| !self.members.contains(&m.partner_id))
        {
            return Err(ChannelConfigError::ModeratorNotMember(outsider.user_id));
        }
        Ok(())
    }

    /// Returns the channel identifier.
    #[must_use]
    pub const fn id(&self) -> ChannelId {
        self.id
    }

    /// Returns the channel name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the channel description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the visibility policy.
    #[must_use]
    pub const fn visibility(&self) -> &ChannelVisibility {
        &self.visibility
    }

    /// Returns `true` when posts are mailed to members.
    #[must_use]
    pub const fn email_send(&self) -> bool {
        self.email_send
    }

    /// Returns `true` when moderation is enabled.
    #[must_use]
    pub const fn moderation(&self) -> bool {
        self.moderation
    }

    /// Returns the guidelines text.
    #[must_use]
    pub fn guidelines(&self) -> Option<&str> {
        self.guidelines.as_deref()
    }

    /// Returns the channel members.
    #[must_use]
    pub const fn members(&self) -> &BTreeSet<PartnerId> {
        &self.members
    }

    /// Returns `true` when the partner is a member.
    #[must_use]
    pub fn is_member(&self, partner_id: PartnerId) -> bool {
        self.members.contains(&partner_id)
    }

    /// Iterates over the channel moderators.
    pub fn moderators(&self) -> impl Iterator<Item = &Moderator> {
        self.moderators.values()
    }

    /// Returns `true` when the user moderates the channel.
    #[must_use]
    pub fn is_moderated_by(&self, user_id: UserId) -> bool {
        self.moderators.contains_key(&user_id)
    }

    /// Returns `true` when a message author counts as a moderator.
    ///
    /// The author matches either by partner or by email address.
    #[must_use]
    pub fn has_moderator_identity(
        &self,
        partner_id: Option<PartnerId>,
        email: Option<&EmailAddress>,
    ) -> bool {
        self.moderators.values().any(|moderator| {
            partner_id == Some(moderator.partner_id) || email == Some(&moderator.email)
        })
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
}

fn validate_name(name: String) -> Result<String, ModerationDomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ModerationDomainError::EmptyChannelName);
    }
    Ok(trimmed.to_owned())
}
