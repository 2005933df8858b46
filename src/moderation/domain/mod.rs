//! Domain model for channel moderation.
//!
//! The moderation domain models channels and their moderators, per-address
//! allow/ban rules, channel messages with their moderation status, the gate
//! that decides the fate of inbound messages, and the channel access policy.
//! All infrastructure concerns are kept outside the domain boundary.

mod access;
mod channel;
mod email;
mod error;
mod gate;
mod ids;
mod message;
mod rule;

pub use access::{
    AccessDecision, AccessGroup, Actor, ActorKind, ChannelOperation, ChannelVisibility,
    evaluate_access,
};
pub use channel::{
    Channel, ChannelChange, ChannelUpdate, ModeratorCandidate, Moderator, NewChannel,
};
pub use email::EmailAddress;
pub use error::{
    ChannelConfigError, ModerationDomainError, ParseModerationStatusError, ParseRuleStatusError,
};
pub use gate::{GateDecision, evaluate_message};
pub use ids::{ChannelId, MessageId, PartnerId, RuleId, UserId};
pub use message::{
    ChannelMessage, MessageAuthor, MessageKind, MessageModerationStatus, NewChannelMessage,
};
pub use rule::{ModerationRule, PersistedRuleData, RuleSet, RuleStatus};
