//! In-memory adapters for moderation ports, used by tests and demos.

mod channel;
mod directory;
mod mailer;
mod messages;
mod rules;

pub use channel::InMemoryChannelRepository;
pub use directory::InMemoryDirectory;
pub use mailer::RecordingMailer;
pub use messages::InMemoryChannelMessageRepository;
pub use rules::InMemoryModerationRuleRepository;

use crate::moderation::ports::ModerationRepositoryError;

fn poisoned(err: impl ToString) -> ModerationRepositoryError {
    ModerationRepositoryError::persistence(std::io::Error::other(err.to_string()))
}
