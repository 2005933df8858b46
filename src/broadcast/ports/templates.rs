//! SMS template lookup port.

use crate::broadcast::domain::{SmsTemplate, TemplateId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for template lookups.
pub type TemplateRepositoryResult<T> = Result<T, TemplateRepositoryError>;

/// Registry of SMS templates.
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Finds a template by identifier.
    async fn find_by_id(&self, id: TemplateId) -> TemplateRepositoryResult<Option<SmsTemplate>>;
}

/// Errors returned by template repositories.
#[derive(Debug, Clone, Error)]
pub enum TemplateRepositoryError {
    /// Storage backend failure.
    #[error("template lookup failed: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TemplateRepositoryError {
    /// Wraps a storage failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
