//! SMS composer: resolves recipients, renders bodies, transmits and logs.

use super::rendering::{SmsRenderError, record_locale, render_sms};
use crate::broadcast::{
    config::BroadcastConfig,
    domain::{
        BlacklistSnapshot, BroadcastTarget, CancelReason, CompositionMode, DeliveryState,
        PhoneNumberError, PhoneSanitizer, RecipientResolver, ResolveOptions, SmsTemplate,
        TargetRecord, TemplateId, parse_number_list,
    },
    ports::{
        BlacklistError, BroadcastLog, BroadcastLogResult, DeliveryAck, LogEntry, OutgoingSms,
        PhoneBlacklist, SmsGateway, TemplateRepository, TemplateRepositoryError,
    },
};
use minijinja::Environment;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Service-level errors for SMS composition.
#[derive(Debug, Error)]
pub enum ComposerError {
    /// Neither a body nor a template was given.
    #[error("an SMS body or template is required")]
    MissingBody,
    /// The template does not exist.
    #[error("SMS template not found: {0}")]
    TemplateNotFound(TemplateId),
    /// A body failed to render.
    #[error(transparent)]
    Render(#[from] SmsRenderError),
    /// Template lookup failed.
    #[error(transparent)]
    Templates(#[from] TemplateRepositoryError),
    /// Blacklist lookup failed.
    #[error(transparent)]
    Blacklist(#[from] BlacklistError),
}

/// Result type for composer operations.
pub type ComposerResult<T> = Result<T, ComposerError>;

/// Where the SMS body comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposeBody {
    /// Body typed by the user, itself a template.
    Literal(String),
    /// Stored template, translated per recipient.
    Template(TemplateId),
}

/// One broadcast to compose.
///
/// Unset switches fall back to the service's [`BroadcastConfig`]; an unset
/// mode is guessed from the number of records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeRequest {
    records: Vec<TargetRecord>,
    mode: Option<CompositionMode>,
    body: Option<ComposeBody>,
    numbers: Vec<String>,
    number_field: Option<String>,
    use_blacklist: Option<bool>,
    keep_log: Option<bool>,
    dedupe: Option<bool>,
}

impl ComposeRequest {
    /// Creates a request about `records`.
    #[must_use]
    pub fn for_records(records: impl IntoIterator<Item = TargetRecord>) -> Self {
        Self {
            records: records.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Forces the composition mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: CompositionMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Uses a typed body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(ComposeBody::Literal(body.into()));
        self
    }

    /// Uses a stored template.
    #[must_use]
    pub fn with_template(mut self, template_id: TemplateId) -> Self {
        self.body = Some(ComposeBody::Template(template_id));
        self
    }

    /// Appends numbers typed as a comma, semicolon or line separated list.
    #[must_use]
    pub fn with_numbers(mut self, list: &str) -> Self {
        self.numbers.extend(parse_number_list(list));
        self
    }

    /// Reads record numbers from `field` only.
    #[must_use]
    pub fn with_number_field(mut self, field: impl Into<String>) -> Self {
        self.number_field = Some(field.into());
        self
    }

    /// Overrides the blacklist switch.
    #[must_use]
    pub const fn with_blacklist(mut self, use_blacklist: bool) -> Self {
        self.use_blacklist = Some(use_blacklist);
        self
    }

    /// Overrides the mass logging switch.
    #[must_use]
    pub const fn with_keep_log(mut self, keep_log: bool) -> Self {
        self.keep_log = Some(keep_log);
        self
    }

    /// Overrides the deduplication switch.
    #[must_use]
    pub const fn with_dedupe(mut self, dedupe: bool) -> Self {
        self.dedupe = Some(dedupe);
        self
    }

    /// Returns the mode the request runs in.
    #[must_use]
    pub fn mode(&self) -> CompositionMode {
        self.mode
            .unwrap_or_else(|| CompositionMode::guess(self.records.len()))
    }
}

/// Outcome of a broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Mode the broadcast ran in.
    pub mode: CompositionMode,
    /// Every target, records first then typed numbers.
    pub targets: Vec<BroadcastTarget>,
    /// Whether the record log entries were stored.
    ///
    /// `false` when logging was off or the log port failed after the SMS
    /// had already been handed to the gateway.
    pub log_written: bool,
}

impl BroadcastReport {
    /// Counts targets waiting at the gateway.
    #[must_use]
    pub fn outgoing(&self) -> usize {
        self.count(|state| matches!(state, DeliveryState::Outgoing))
    }

    /// Counts targets confirmed delivered.
    #[must_use]
    pub fn sent(&self) -> usize {
        self.count(|state| matches!(state, DeliveryState::Sent))
    }

    /// Counts targets the gateway failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|state| matches!(state, DeliveryState::Failed(_)))
    }

    /// Counts targets canceled for `reason`.
    #[must_use]
    pub fn canceled(&self, reason: CancelReason) -> usize {
        self.count(|state| *state == DeliveryState::Canceled(reason))
    }

    fn count(&self, predicate: impl Fn(&DeliveryState) -> bool) -> usize {
        self.targets
            .iter()
            .filter(|target| predicate(target.state()))
            .count()
    }
}

/// Port handles needed by [`SmsComposerService`].
#[derive(Clone)]
pub struct BroadcastPorts<B, G, L, T> {
    /// Opt-out lookup.
    pub blacklist: Arc<B>,
    /// SMS transport.
    pub gateway: Arc<G>,
    /// Per-record trace store.
    pub log: Arc<L>,
    /// Template registry.
    pub templates: Arc<T>,
}

enum BodySource {
    Literal(String),
    Template(SmsTemplate),
}

impl BodySource {
    fn body_for(&self, record: Option<&TargetRecord>) -> &str {
        match self {
            Self::Literal(body) => body,
            Self::Template(template) => template.body_for(record_locale(record)),
        }
    }
}

/// Sends SMS to records and typed numbers.
#[derive(Clone)]
pub struct SmsComposerService<B, G, L, T, C>
where
    B: PhoneBlacklist,
    G: SmsGateway,
    L: BroadcastLog,
    T: TemplateRepository,
    C: Clock + Send + Sync,
{
    blacklist: Arc<B>,
    gateway: Arc<G>,
    log: Arc<L>,
    templates: Arc<T>,
    clock: Arc<C>,
    config: BroadcastConfig,
    resolver: RecipientResolver,
}

impl<B, G, L, T, C> SmsComposerService<B, G, L, T, C>
where
    B: PhoneBlacklist,
    G: SmsGateway,
    L: BroadcastLog,
    T: TemplateRepository,
    C: Clock + Send + Sync,
{
    /// Creates a composer.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneNumberError::InvalidCallingCode`] when the configured
    /// default calling code is malformed.
    pub fn new(
        ports: BroadcastPorts<B, G, L, T>,
        clock: Arc<C>,
        config: BroadcastConfig,
    ) -> Result<Self, PhoneNumberError> {
        let sanitizer = config.default_calling_code.as_deref().map_or_else(
            || Ok(PhoneSanitizer::international_only()),
            PhoneSanitizer::with_default_calling_code,
        )?;
        let BroadcastPorts {
            blacklist,
            gateway,
            log,
            templates,
        } = ports;
        Ok(Self {
            blacklist,
            gateway,
            log,
            templates,
            clock,
            config,
            resolver: RecipientResolver::new(sanitizer),
        })
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &BroadcastConfig {
        &self.config
    }

    /// Returns the sanitizer applied to every number.
    #[must_use]
    pub const fn sanitizer(&self) -> &PhoneSanitizer {
        self.resolver.sanitizer()
    }

    /// Resolves, renders, transmits and logs one broadcast.
    ///
    /// Gateway failures mark their target failed and do not stop the batch.
    ///
    /// # Errors
    ///
    /// Returns [`ComposerError`] when the body is missing or fails to render,
    /// or when the template or blacklist ports fail. A failing log port does
    /// not fail the send; it clears [`BroadcastReport::log_written`].
    pub async fn send(&self, request: ComposeRequest) -> ComposerResult<BroadcastReport> {
        let mode = request.mode();
        let source = self.body_source(request.body.as_ref()).await?;
        let options = self.resolve_options(&request, mode);
        let keep_log = !mode.is_mass() || request.keep_log.unwrap_or(self.config.keep_log);

        let addresses = self.resolver.collect(&request.records, &options);
        let blacklist = if mode.is_mass() && options.use_blacklist {
            let destinations = RecipientResolver::destinations(&addresses);
            self.blacklist.active_among(&destinations).await?
        } else {
            BlacklistSnapshot::default()
        };

        let env = Environment::new();
        let mut targets = RecipientResolver::finalize(addresses, &options, &blacklist, |address| {
            render_sms(&env, source.body_for(address.record), address.record)
        })?;

        for target in targets.iter_mut().filter(|target| target.is_outgoing()) {
            self.transmit(target).await;
        }

        let log_written = keep_log
            && self.write_log(mode, &targets).await.map_or_else(
                |error| {
                    warn!(%error, "SMS already transmitted; record log not written");
                    false
                },
                |()| true,
            );

        let report = BroadcastReport {
            mode,
            targets,
            log_written,
        };
        info!(
            mode = %mode,
            outgoing = report.outgoing(),
            sent = report.sent(),
            failed = report.failed(),
            blacklisted = report.canceled(CancelReason::Blacklist),
            duplicates = report.canceled(CancelReason::Duplicate),
            invalid = report.canceled(CancelReason::InvalidNumber),
            "SMS broadcast composed"
        );
        Ok(report)
    }

    /// Returns the body the user would see before sending.
    ///
    /// A template is rendered in the recipient's locale when the request is
    /// in comment mode about exactly one record; otherwise its base body is
    /// returned unrendered. Typed bodies are returned as typed.
    ///
    /// # Errors
    ///
    /// Returns [`ComposerError`] when the body is missing, the template
    /// lookup fails, or rendering fails.
    pub async fn preview(&self, request: &ComposeRequest) -> ComposerResult<String> {
        let source = self.body_source(request.body.as_ref()).await?;
        match (&source, request.mode(), request.records.as_slice()) {
            (BodySource::Template(_), CompositionMode::Comment, [record]) => Ok(render_sms(
                &Environment::new(),
                source.body_for(Some(record)),
                Some(record),
            )?),
            (BodySource::Template(template), _, _) => Ok(template.body().to_owned()),
            (BodySource::Literal(body), _, _) => Ok(body.clone()),
        }
    }

    async fn body_source(&self, body: Option<&ComposeBody>) -> ComposerResult<BodySource> {
        match body {
            Some(ComposeBody::Literal(text)) if !text.trim().is_empty() => {
                Ok(BodySource::Literal(text.clone()))
            }
            Some(ComposeBody::Template(id)) => self
                .templates
                .find_by_id(*id)
                .await?
                .map(BodySource::Template)
                .ok_or(ComposerError::TemplateNotFound(*id)),
            Some(ComposeBody::Literal(_)) | None => Err(ComposerError::MissingBody),
        }
    }

    fn resolve_options(&self, request: &ComposeRequest, mode: CompositionMode) -> ResolveOptions {
        ResolveOptions {
            mode,
            number_field: request.number_field.clone(),
            explicit_numbers: request.numbers.clone(),
            use_blacklist: request.use_blacklist.unwrap_or(self.config.use_blacklist),
            dedupe: request.dedupe.unwrap_or(self.config.dedupe),
        }
    }

    async fn transmit(&self, target: &mut BroadcastTarget) {
        let Some(destination) = target.destination().cloned() else {
            return;
        };
        let sms = OutgoingSms {
            record_id: target.record_id(),
            destination,
            body: target.body().to_owned(),
        };
        match self.gateway.send(&sms).await {
            Ok(DeliveryAck::Delivered) => target.mark_sent(),
            Ok(DeliveryAck::Queued) => {
                debug!(destination = %sms.destination, "SMS queued at gateway");
            }
            Err(error) => {
                warn!(destination = %sms.destination, %error, "SMS transmission failed");
                target.mark_failed(error.to_string());
            }
        }
    }

    async fn write_log(
        &self,
        mode: CompositionMode,
        targets: &[BroadcastTarget],
    ) -> BroadcastLogResult<()> {
        let logged_at = self.clock.utc();
        let entries: Vec<LogEntry> = targets
            .iter()
            .filter_map(|target| {
                target.record_id().map(|record_id| LogEntry {
                    record_id,
                    mode,
                    destination: target.destination().cloned(),
                    body: target.body().to_owned(),
                    state: target.state().clone(),
                    logged_at,
                })
            })
            .collect();
        if !entries.is_empty() {
            self.log.append(&entries).await?;
        }
        Ok(())
    }
}
