//! Moderation gate deciding the fate of inbound channel messages.

use super::{Channel, EmailAddress, MessageModerationStatus, RuleSet};

/// Decision taken for an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateDecision {
    /// Deliver the message immediately.
    Accept,
    /// Store the message and wait for a moderator.
    HoldForModeration,
    /// Drop the message; it is never stored nor delivered.
    Discard,
}

impl GateDecision {
    /// Returns the status a stored message gets, or `None` when discarded.
    #[must_use]
    pub const fn initial_status(self) -> Option<MessageModerationStatus> {
        match self {
            Self::Accept => Some(MessageModerationStatus::Accepted),
            Self::HoldForModeration => Some(MessageModerationStatus::PendingModeration),
            Self::Discard => None,
        }
    }
}

/// Decides what happens to a message posted on `channel`.
///
/// Channels without moderation accept everything. On moderated channels a
/// ban wins over everything else, then moderators (and system posts, which
/// callers report as `is_moderator`) are accepted, then allowed addresses;
/// anything left waits for review.
#[must_use]
pub fn evaluate_message(
    channel: &Channel,
    rules: &RuleSet,
    author_address: Option<&EmailAddress>,
    is_moderator: bool,
) -> GateDecision {
    if !channel.moderation() {
        return GateDecision::Accept;
    }
    if author_address.is_some_and(|email| rules.is_banned(email)) {
        return GateDecision::Discard;
    }
    if is_moderator || author_address.is_some_and(|email| rules.is_allowed(email)) {
        return GateDecision::Accept;
    }
    GateDecision::HoldForModeration
}
