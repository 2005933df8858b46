//! Shared world state for SMS broadcast BDD scenarios.

use std::sync::Arc;

use courier::broadcast::{
    BroadcastConfig,
    adapters::memory::{
        InMemoryBroadcastLog, InMemoryPhoneBlacklist, InMemoryTemplateRepository,
        RecordingSmsGateway,
    },
    domain::{PhoneNumberError, TargetRecord, TemplateId},
    services::{BroadcastPorts, BroadcastReport, ComposerError, SmsComposerService},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Composer used by the BDD world.
pub type TestComposer = SmsComposerService<
    InMemoryPhoneBlacklist,
    RecordingSmsGateway,
    InMemoryBroadcastLog,
    InMemoryTemplateRepository,
    DefaultClock,
>;

/// Scenario world for SMS broadcast behaviour tests.
pub struct BroadcastWorld {
    pub blacklist: Arc<InMemoryPhoneBlacklist>,
    pub gateway: Arc<RecordingSmsGateway>,
    pub templates: Arc<InMemoryTemplateRepository>,
    pub composer: Option<TestComposer>,
    pub records: Vec<TargetRecord>,
    pub template_id: Option<TemplateId>,
    pub last_report: Option<Result<BroadcastReport, ComposerError>>,
}

impl BroadcastWorld {
    /// Creates a world with empty adapters and no composer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            blacklist: Arc::new(InMemoryPhoneBlacklist::new()),
            gateway: Arc::new(RecordingSmsGateway::new()),
            templates: Arc::new(InMemoryTemplateRepository::new()),
            composer: None,
            records: Vec::new(),
            template_id: None,
            last_report: None,
        }
    }

    /// Builds the composer over the world's adapters.
    ///
    /// # Errors
    ///
    /// Returns an error when the calling code is malformed.
    pub fn configure(&mut self, calling_code: &str) -> Result<(), PhoneNumberError> {
        let composer = SmsComposerService::new(
            BroadcastPorts {
                blacklist: Arc::clone(&self.blacklist),
                gateway: Arc::clone(&self.gateway),
                log: Arc::new(InMemoryBroadcastLog::new()),
                templates: Arc::clone(&self.templates),
            },
            Arc::new(DefaultClock),
            BroadcastConfig::with_calling_code(calling_code),
        )?;
        self.composer = Some(composer);
        Ok(())
    }

    /// Returns the configured composer.
    ///
    /// # Errors
    ///
    /// Returns an error when no composer was configured yet.
    pub fn composer(&self) -> Result<&TestComposer, eyre::Report> {
        self.composer
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing composer in scenario world"))
    }

    /// Returns the report of the last broadcast.
    ///
    /// # Errors
    ///
    /// Returns an error when nothing was sent or the broadcast failed.
    pub fn report(&self) -> Result<&BroadcastReport, eyre::Report> {
        match self.last_report.as_ref() {
            Some(Ok(report)) => Ok(report),
            Some(Err(err)) => Err(eyre::eyre!("broadcast failed: {err}")),
            None => Err(eyre::eyre!("missing broadcast report")),
        }
    }
}

impl Default for BroadcastWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BroadcastWorld {
    BroadcastWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
