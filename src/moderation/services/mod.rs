//! Service layer for channel moderation.
//!
//! [`ChannelAdministrationService`] owns channel configuration, address
//! rules and the moderation counters. [`ChannelModerationService`] runs
//! messages through the moderation gate, applies moderator decisions and
//! mails channel guidelines.

mod channel;
mod guidelines;
mod mail;
mod moderation;
mod posting;
mod review;

pub use channel::{ChannelAdministrationService, ChannelServiceError, ChannelServiceResult};
pub use mail::MailTemplateError;
pub use moderation::{
    ChannelModerationService, ModerationPorts, ModerationServiceError, ModerationServiceResult,
};
pub use posting::{PostAuthor, PostMessageRequest, PostOutcome};
pub use review::{ModerationDecision, ModerationSummary};
