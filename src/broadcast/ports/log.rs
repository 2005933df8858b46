//! Per-record broadcast log port.

use crate::broadcast::domain::{CompositionMode, DeliveryState, PhoneNumber, RecordId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Result type for log operations.
pub type BroadcastLogResult<T> = Result<T, BroadcastLogError>;

/// Trace of an SMS left on the record it was sent about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Record the entry is attached to.
    pub record_id: RecordId,
    /// Mode of the broadcast that produced the SMS.
    pub mode: CompositionMode,
    /// Destination, when one could be derived.
    pub destination: Option<PhoneNumber>,
    /// Rendered body.
    pub body: String,
    /// State of the SMS once the broadcast finished.
    pub state: DeliveryState,
    /// When the entry was written.
    pub logged_at: DateTime<Utc>,
}

/// Store of per-record broadcast traces.
#[async_trait]
pub trait BroadcastLog: Send + Sync {
    /// Appends entries in order.
    async fn append(&self, entries: &[LogEntry]) -> BroadcastLogResult<()>;
}

/// Errors returned by log implementations.
#[derive(Debug, Clone, Error)]
pub enum BroadcastLogError {
    /// Storage backend failure.
    #[error("broadcast log failure: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl BroadcastLogError {
    /// Wraps a storage failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
