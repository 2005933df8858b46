//! Shared fixtures for in-memory integration tests.

use std::sync::Arc;

use courier::{
    broadcast::{
        BroadcastConfig,
        adapters::memory::{
            InMemoryBroadcastLog, InMemoryPhoneBlacklist, InMemoryTemplateRepository,
            RecordingSmsGateway,
        },
        services::{BroadcastPorts, SmsComposerService},
    },
    moderation::{
        adapters::memory::{
            InMemoryChannelMessageRepository, InMemoryChannelRepository, InMemoryDirectory,
            InMemoryModerationRuleRepository, RecordingMailer,
        },
        domain::{EmailAddress, PartnerId, UserId},
        services::{ChannelAdministrationService, ChannelModerationService, ModerationPorts},
    },
};
use mockable::DefaultClock;
use rstest::fixture;

/// Channel administration wired to in-memory adapters.
pub type TestAdmin = ChannelAdministrationService<
    InMemoryChannelRepository,
    InMemoryModerationRuleRepository,
    InMemoryChannelMessageRepository,
    InMemoryDirectory,
    DefaultClock,
>;

/// Message moderation wired to in-memory adapters.
pub type TestModeration = ChannelModerationService<
    InMemoryChannelRepository,
    InMemoryModerationRuleRepository,
    InMemoryChannelMessageRepository,
    InMemoryDirectory,
    RecordingMailer,
    DefaultClock,
>;

/// SMS composer wired to in-memory adapters.
pub type TestComposer = SmsComposerService<
    InMemoryPhoneBlacklist,
    RecordingSmsGateway,
    InMemoryBroadcastLog,
    InMemoryTemplateRepository,
    DefaultClock,
>;

/// Every moderation adapter plus the services built on them.
pub struct ModerationStack {
    pub directory: Arc<InMemoryDirectory>,
    pub channels: Arc<InMemoryChannelRepository>,
    pub rules: Arc<InMemoryModerationRuleRepository>,
    pub messages: Arc<InMemoryChannelMessageRepository>,
    pub mailer: Arc<RecordingMailer>,
    pub admin: TestAdmin,
    pub moderation: TestModeration,
}

impl ModerationStack {
    /// Registers a directory user.
    ///
    /// # Errors
    ///
    /// Returns an error when the address is invalid or the directory fails.
    pub fn user(
        &self,
        name: &str,
        email: Option<&str>,
    ) -> Result<(UserId, PartnerId), eyre::Report> {
        let parsed = email.map(EmailAddress::parse).transpose()?;
        Ok(self.directory.add_user(name, parsed)?)
    }
}

/// Provides fresh moderation adapters and services.
#[fixture]
pub fn moderation_stack() -> ModerationStack {
    let directory = Arc::new(InMemoryDirectory::new());
    let channels = Arc::new(InMemoryChannelRepository::new());
    let rules = Arc::new(InMemoryModerationRuleRepository::new());
    let messages = Arc::new(InMemoryChannelMessageRepository::new());
    let mailer = Arc::new(RecordingMailer::new());
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
            channels: Arc::clone(&channels),
            rules: Arc::clone(&rules),
            messages: Arc::clone(&messages),
            directory: Arc::clone(&directory),
            mailer: Arc::clone(&mailer),
        },
        clock,
    );
    ModerationStack {
        directory,
        channels,
        rules,
        messages,
        mailer,
        admin,
        moderation,
    }
}

/// Every broadcast adapter plus the composer built on them.
pub struct BroadcastStack {
    pub blacklist: Arc<InMemoryPhoneBlacklist>,
    pub gateway: Arc<RecordingSmsGateway>,
    pub log: Arc<InMemoryBroadcastLog>,
    pub templates: Arc<InMemoryTemplateRepository>,
    pub composer: TestComposer,
}

/// Provides a composer completing national numbers with `+32`.
///
/// # Panics
///
/// Panics if the fixed calling code is rejected.
#[fixture]
pub fn broadcast_stack() -> BroadcastStack {
    let blacklist = Arc::new(InMemoryPhoneBlacklist::new());
    let gateway = Arc::new(RecordingSmsGateway::new());
    let log = Arc::new(InMemoryBroadcastLog::new());
    let templates = Arc::new(InMemoryTemplateRepository::new());
    let composer = SmsComposerService::new(
        BroadcastPorts {
            blacklist: Arc::clone(&blacklist),
            gateway: Arc::clone(&gateway),
            log: Arc::clone(&log),
            templates: Arc::clone(&templates),
        },
        Arc::new(DefaultClock),
        BroadcastConfig::with_calling_code("32"),
    )
    .expect("calling code is valid");
    BroadcastStack {
        blacklist,
        gateway,
        log,
        templates,
        composer,
    }
}
