//! Phone blacklist port.

use crate::broadcast::domain::{BlacklistSnapshot, PhoneNumber};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for blacklist lookups.
pub type BlacklistResult<T> = Result<T, BlacklistError>;

/// Numbers that opted out of SMS.
#[async_trait]
pub trait PhoneBlacklist: Send + Sync {
    /// Returns which of `numbers` are actively blacklisted.
    async fn active_among(&self, numbers: &[PhoneNumber]) -> BlacklistResult<BlacklistSnapshot>;
}

/// Errors returned by blacklist implementations.
#[derive(Debug, Clone, Error)]
pub enum BlacklistError {
    /// Lookup backend failure.
    #[error("blacklist lookup failed: {0}")]
    Lookup(Arc<dyn std::error::Error + Send + Sync>),
}

impl BlacklistError {
    /// Wraps a lookup failure.
    pub fn lookup(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Lookup(Arc::new(err))
    }
}
