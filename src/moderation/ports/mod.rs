//! Port contracts for channel moderation.
//!
//! Ports define infrastructure-agnostic interfaces used by moderation
//! services: persistence, the user directory and the outbound mail queue.

pub mod directory;
pub mod mailer;
pub mod repository;

pub use directory::{Directory, DirectoryError, DirectoryResult, PartnerProfile, UserProfile};
pub use mailer::{MailRecipient, MailState, Mailer, MailerError, MailerResult, OutboundMail};
pub use repository::{
    ChannelMessageRepository, ChannelRepository, ModerationRepositoryError,
    ModerationRepositoryResult, ModerationRuleRepository,
};
