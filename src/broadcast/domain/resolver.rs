//! Recipient resolution: from records and typed numbers to broadcast targets.
//!
//! Resolution runs in two passes. [`RecipientResolver::collect`] derives one
//! address per record and per explicit number, sanitising each to its
//! canonical destination. [`RecipientResolver::finalize`] then applies, in
//! mass mode, deduplication followed by the blacklist, and renders the body
//! of every target. Splitting the passes lets callers fetch the blacklist
//! for exactly the destinations collected, through whatever port they use.

use super::{
    BroadcastTarget, CancelReason, CompositionMode, DeliveryState, PhoneNumber, PhoneNumberError,
    PhoneSanitizer, TargetRecord,
};
use std::collections::{BTreeSet, HashSet};

/// Switches controlling one resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Composition mode.
    pub mode: CompositionMode,
    /// Record field to read numbers from instead of the default lookup.
    pub number_field: Option<String>,
    /// Numbers typed by the user, appended after the records.
    pub explicit_numbers: Vec<String>,
    /// Cancels blacklisted destinations in mass mode.
    pub use_blacklist: bool,
    /// Cancels repeated destinations in mass mode.
    pub dedupe: bool,
}

impl ResolveOptions {
    /// Creates options for `mode` with blacklist and deduplication enabled.
    #[must_use]
    pub const fn new(mode: CompositionMode) -> Self {
        Self {
            mode,
            number_field: None,
            explicit_numbers: Vec::new(),
            use_blacklist: true,
            dedupe: true,
        }
    }

    /// Reads numbers from `field` only.
    #[must_use]
    pub fn with_number_field(mut self, field: impl Into<String>) -> Self {
        self.number_field = Some(field.into());
        self
    }

    /// Appends typed numbers.
    #[must_use]
    pub fn with_explicit_numbers<I, S>(mut self, numbers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.explicit_numbers.extend(numbers.into_iter().map(Into::into));
        self
    }

    /// Enables or disables the blacklist check.
    #[must_use]
    pub const fn with_blacklist(mut self, use_blacklist: bool) -> Self {
        self.use_blacklist = use_blacklist;
        self
    }

    /// Enables or disables deduplication.
    #[must_use]
    pub const fn with_dedupe(mut self, dedupe: bool) -> Self {
        self.dedupe = dedupe;
        self
    }
}

/// Destinations that were actively blacklisted when the broadcast started.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlacklistSnapshot(HashSet<PhoneNumber>);

impl BlacklistSnapshot {
    /// Returns `true` when `number` is blacklisted.
    #[must_use]
    pub fn contains(&self, number: &PhoneNumber) -> bool {
        self.0.contains(number)
    }

    /// Returns the number of blacklisted destinations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when nothing is blacklisted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<PhoneNumber> for BlacklistSnapshot {
    fn from_iter<T: IntoIterator<Item = PhoneNumber>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// An address collected for one record or typed number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAddress<'r> {
    /// Source record, absent for typed numbers.
    pub record: Option<&'r TargetRecord>,
    /// Number as found on the record or typed.
    pub raw_number: Option<String>,
    /// Sanitised destination, or why there is none.
    pub destination: Result<PhoneNumber, PhoneNumberError>,
}

/// Turns records and typed numbers into broadcast targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipientResolver {
    sanitizer: PhoneSanitizer,
}

impl RecipientResolver {
    /// Creates a resolver sanitising numbers with `sanitizer`.
    #[must_use]
    pub const fn new(sanitizer: PhoneSanitizer) -> Self {
        Self { sanitizer }
    }

    /// Returns the sanitizer in use.
    #[must_use]
    pub const fn sanitizer(&self) -> &PhoneSanitizer {
        &self.sanitizer
    }

    /// Collects one address per record, then one per typed number, in input
    /// order.
    #[must_use]
    pub fn collect<'r>(
        &self,
        records: &'r [TargetRecord],
        options: &ResolveOptions,
    ) -> Vec<ResolvedAddress<'r>> {
        let from_records = records.iter().map(|record| {
            let raw = record.number(options.number_field.as_deref());
            ResolvedAddress {
                record: Some(record),
                raw_number: raw.map(str::to_owned),
                destination: raw.map_or(Err(PhoneNumberError::Empty), |number| {
                    self.sanitizer.sanitize(number)
                }),
            }
        });
        let typed = options
            .explicit_numbers
            .iter()
            .map(|number| ResolvedAddress {
                record: None,
                raw_number: Some(number.clone()),
                destination: self.sanitizer.sanitize(number),
            });
        from_records.chain(typed).collect()
    }

    /// Returns the distinct valid destinations among `addresses`, sorted.
    #[must_use]
    pub fn destinations(addresses: &[ResolvedAddress<'_>]) -> Vec<PhoneNumber> {
        addresses
            .iter()
            .filter_map(|address| address.destination.as_ref().ok())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Assigns a state to every address and renders its body.
    ///
    /// Invalid addresses are canceled first. In mass mode, deduplication
    /// keeps the first target per destination and cancels the others; the
    /// blacklist then cancels the remaining outgoing targets it lists, so
    /// the copies of a blacklisted destination stay duplicates.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `render`.
    pub fn finalize<'r, E, F>(
        addresses: Vec<ResolvedAddress<'r>>,
        options: &ResolveOptions,
        blacklist: &BlacklistSnapshot,
        mut render: F,
    ) -> Result<Vec<BroadcastTarget>, E>
    where
        F: FnMut(&ResolvedAddress<'r>) -> Result<String, E>,
    {
        let mass = options.mode.is_mass();
        let mut seen: HashSet<PhoneNumber> = HashSet::new();
        addresses
            .into_iter()
            .map(|address| {
                let state = match &address.destination {
                    Err(_) => DeliveryState::Canceled(CancelReason::InvalidNumber),
                    Ok(number) if mass && options.dedupe && !seen.insert(number.clone()) => {
                        DeliveryState::Canceled(CancelReason::Duplicate)
                    }
                    Ok(number) if mass && options.use_blacklist && blacklist.contains(number) => {
                        DeliveryState::Canceled(CancelReason::Blacklist)
                    }
                    Ok(_) => DeliveryState::Outgoing,
                };
                let body = render(&address)?;
                let ResolvedAddress {
                    record,
                    raw_number,
                    destination,
                } = address;
                Ok(BroadcastTarget::new(
                    record.map(TargetRecord::id),
                    record.and_then(TargetRecord::recipient).map(|r| r.id()),
                    raw_number,
                    destination.ok(),
                    body,
                    state,
                ))
            })
            .collect()
    }

    /// Collects and finalises in one call.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `render`.
    pub fn resolve<'r, E, F>(
        &self,
        records: &'r [TargetRecord],
        options: &ResolveOptions,
        blacklist: &BlacklistSnapshot,
        render: F,
    ) -> Result<Vec<BroadcastTarget>, E>
    where
        F: FnMut(&ResolvedAddress<'r>) -> Result<String, E>,
    {
        let addresses = self.collect(records, options);
        Self::finalize(addresses, options, blacklist, render)
    }
}
