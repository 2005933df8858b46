//! Error types for moderation domain validation and parsing.

use super::{MessageId, MessageModerationStatus, PartnerId, UserId};
use thiserror::Error;

/// Errors returned while constructing moderation domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModerationDomainError {
    /// The email address is empty after trimming.
    #[error("email address must not be empty")]
    EmptyEmail,

    /// The email address is not a single `local@domain` mailbox.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// The channel name is empty after trimming.
    #[error("channel name must not be empty")]
    EmptyChannelName,

    /// A message moderation status change is not permitted.
    #[error("message {message_id} cannot move from {from} to {to}")]
    InvalidModerationTransition {
        /// Message being reviewed.
        message_id: MessageId,
        /// Current status.
        from: MessageModerationStatus,
        /// Requested status.
        to: MessageModerationStatus,
    },
}

/// Channel configuration invariant violations.
///
/// Raised synchronously by every mutating write; a failing write leaves the
/// channel unchanged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChannelConfigError {
    /// Moderation is only available on mailing-list channels.
    #[error("moderated channels must send emails to their members")]
    ModerationRequiresMailingList,

    /// A moderated channel must keep at least one moderator.
    #[error("moderated channels must have at least one moderator")]
    ModerationWithoutModerators,

    /// The moderator's partner is not a member of the channel.
    #[error("moderator {0} must be a member of the channel")]
    ModeratorNotMember(UserId),

    /// The moderator has no email address to be contacted on.
    #[error("moderator {0} must have an email address")]
    ModeratorWithoutEmail(UserId),

    /// The member cannot leave while still moderating the channel.
    #[error("partner {0} still moderates the channel and cannot leave it")]
    MemberIsModerator(PartnerId),

    /// Domain validation failed while applying the change.
    #[error(transparent)]
    Domain(#[from] ModerationDomainError),
}

/// Error returned while parsing a rule status from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown moderation rule status: {0}")]
pub struct ParseRuleStatusError(pub String);

/// Error returned while parsing a message moderation status from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown message moderation status: {0}")]
pub struct ParseModerationStatusError(pub String);
