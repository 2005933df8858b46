//! In-memory phone blacklist.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::poisoned;
use crate::broadcast::{
    domain::{BlacklistSnapshot, PhoneNumber},
    ports::{BlacklistError, BlacklistResult, PhoneBlacklist},
};

/// Thread-safe blacklist keeping deactivated entries, as opt-outs do.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPhoneBlacklist {
    entries: Arc<RwLock<HashMap<PhoneNumber, bool>>>,
}

impl InMemoryPhoneBlacklist {
    /// Creates an empty blacklist.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Blacklists `number`, reactivating a deactivated entry.
    ///
    /// # Errors
    ///
    /// Returns [`BlacklistError::Lookup`] when the lock is poisoned.
    pub fn add(&self, number: PhoneNumber) -> BlacklistResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|err| BlacklistError::lookup(poisoned(err)))?;
        entries.insert(number, true);
        Ok(())
    }

    /// Deactivates the entry for `number`, keeping it on record.
    ///
    /// # Errors
    ///
    /// Returns [`BlacklistError::Lookup`] when the lock is poisoned.
    pub fn deactivate(&self, number: &PhoneNumber) -> BlacklistResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|err| BlacklistError::lookup(poisoned(err)))?;
        if let Some(active) = entries.get_mut(number) {
            *active = false;
        }
        Ok(())
    }
}

#[async_trait]
impl PhoneBlacklist for InMemoryPhoneBlacklist {
    async fn active_among(&self, numbers: &[PhoneNumber]) -> BlacklistResult<BlacklistSnapshot> {
        let entries = self
            .entries
            .read()
            .map_err(|err| BlacklistError::lookup(poisoned(err)))?;
        Ok(numbers
            .iter()
            .filter(|number| entries.get(*number).copied().unwrap_or(false))
            .cloned()
            .collect())
    }
}
