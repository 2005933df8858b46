//! In-memory broadcast log.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use super::poisoned;
use crate::broadcast::{
    domain::RecordId,
    ports::{BroadcastLog, BroadcastLogError, BroadcastLogResult, LogEntry},
};

/// Thread-safe append-only log.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBroadcastLog {
    entries: Arc<RwLock<Vec<LogEntry>>>,
}

impl InMemoryBroadcastLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every entry, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .read()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Returns the entries attached to `record_id`, oldest first.
    #[must_use]
    pub fn entries_for(&self, record_id: RecordId) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|entry| entry.record_id == record_id)
            .collect()
    }
}

#[async_trait]
impl BroadcastLog for InMemoryBroadcastLog {
    async fn append(&self, entries: &[LogEntry]) -> BroadcastLogResult<()> {
        let mut stored = self
            .entries
            .write()
            .map_err(|err| BroadcastLogError::persistence(poisoned(err)))?;
        stored.extend_from_slice(entries);
        Ok(())
    }
}
