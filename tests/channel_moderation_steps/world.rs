//! Shared world state for channel moderation BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use courier::moderation::{
    adapters::memory::{
        InMemoryChannelMessageRepository, InMemoryChannelRepository, InMemoryDirectory,
        InMemoryModerationRuleRepository, RecordingMailer,
    },
    domain::{Channel, EmailAddress, PartnerId, UserId},
    services::{
        ChannelAdministrationService, ChannelModerationService, ChannelServiceError,
        ModerationPorts, PostOutcome,
    },
};
use mockable::DefaultClock;
use rstest::fixture;

/// Channel administration used by the BDD world.
pub type TestAdmin = ChannelAdministrationService<
    InMemoryChannelRepository,
    InMemoryModerationRuleRepository,
    InMemoryChannelMessageRepository,
    InMemoryDirectory,
    DefaultClock,
>;

/// Message moderation used by the BDD world.
pub type TestModeration = ChannelModerationService<
    InMemoryChannelRepository,
    InMemoryModerationRuleRepository,
    InMemoryChannelMessageRepository,
    InMemoryDirectory,
    RecordingMailer,
    DefaultClock,
>;

/// Scenario world for channel moderation behaviour tests.
pub struct ModerationWorld {
    pub directory: Arc<InMemoryDirectory>,
    pub messages: Arc<InMemoryChannelMessageRepository>,
    pub admin: TestAdmin,
    pub moderation: TestModeration,
    pub people: HashMap<EmailAddress, (UserId, PartnerId)>,
    pub channel: Option<Channel>,
    pub last_post: Option<PostOutcome>,
    pub last_update: Option<Result<Channel, ChannelServiceError>>,
}

impl ModerationWorld {
    /// Creates a world with an empty directory and no channel.
    #[must_use]
    pub fn new() -> Self {
        let channels = Arc::new(InMemoryChannelRepository::new());
        let rules = Arc::new(InMemoryModerationRuleRepository::new());
        let messages = Arc::new(InMemoryChannelMessageRepository::new());
        let directory = Arc::new(InMemoryDirectory::new());
        let clock = Arc::new(DefaultClock);

        let admin = ChannelAdministrationService::new(
            Arc::clone(&channels),
            Arc::clone(&rules),
            Arc::clone(&messages),
            Arc::clone(&directory),
            Arc::clone(&clock),
        );
        let moderation = ChannelModerationService::new(
            ModerationPorts {
                channels,
                rules,
                messages: Arc::clone(&messages),
                directory: Arc::clone(&directory),
                mailer: Arc::new(RecordingMailer::new()),
            },
            clock,
        );

        Self {
            directory,
            messages,
            admin,
            moderation,
            people: HashMap::new(),
            channel: None,
            last_post: None,
            last_update: None,
        }
    }

    /// Returns the user registered under `email`, registering it first when
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns an error when the address is invalid or the directory fails.
    pub fn person(&mut self, email: &str) -> Result<(UserId, PartnerId), eyre::Report> {
        let address = EmailAddress::parse(email)?;
        if let Some(ids) = self.people.get(&address) {
            return Ok(*ids);
        }
        let name = address
            .as_str()
            .split('@')
            .next()
            .unwrap_or_default()
            .to_owned();
        let ids = self.directory.add_user(name, Some(address.clone()))?;
        self.people.insert(address, ids);
        Ok(ids)
    }

    /// Returns the channel created by the scenario.
    ///
    /// # Errors
    ///
    /// Returns an error when no channel was created yet.
    pub fn channel(&self) -> Result<&Channel, eyre::Report> {
        self.channel
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing channel in scenario world"))
    }
}

impl Default for ModerationWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ModerationWorld {
    ModerationWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
