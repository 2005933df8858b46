//! In-memory SMS template registry.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::poisoned;
use crate::broadcast::{
    domain::{SmsTemplate, TemplateId},
    ports::{TemplateRepository, TemplateRepositoryError, TemplateRepositoryResult},
};

/// Thread-safe template registry keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTemplateRepository {
    templates: Arc<RwLock<HashMap<TemplateId, SmsTemplate>>>,
}

impl InMemoryTemplateRepository {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `template`, replacing any template with the same identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateRepositoryError::Persistence`] when the lock is
    /// poisoned.
    pub fn insert(&self, template: SmsTemplate) -> TemplateRepositoryResult<TemplateId> {
        let mut templates = self
            .templates
            .write()
            .map_err(|err| TemplateRepositoryError::persistence(poisoned(err)))?;
        let id = template.id();
        templates.insert(id, template);
        Ok(id)
    }
}

#[async_trait]
impl TemplateRepository for InMemoryTemplateRepository {
    async fn find_by_id(&self, id: TemplateId) -> TemplateRepositoryResult<Option<SmsTemplate>> {
        let templates = self
            .templates
            .read()
            .map_err(|err| TemplateRepositoryError::persistence(poisoned(err)))?;
        Ok(templates.get(&id).cloned())
    }
}
