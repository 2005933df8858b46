//! In-memory user and partner directory.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::moderation::{
    domain::{EmailAddress, PartnerId, UserId},
    ports::{Directory, DirectoryError, DirectoryResult, PartnerProfile, UserProfile},
};

/// Thread-safe in-memory directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    state: Arc<RwLock<DirectoryState>>,
}

#[derive(Debug, Default)]
struct DirectoryState {
    partners: HashMap<PartnerId, PartnerProfile>,
    users: HashMap<UserId, PartnerId>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a partner and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] when the directory lock is poisoned.
    pub fn add_partner(
        &self,
        name: impl Into<String>,
        email: Option<EmailAddress>,
    ) -> DirectoryResult<PartnerId> {
        let id = PartnerId::new();
        let mut state = self.state.write().map_err(lock_error)?;
        state.partners.insert(
            id,
            PartnerProfile {
                id,
                name: name.into(),
                email,
            },
        );
        Ok(id)
    }

    /// Registers a user acting as a new partner.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] when the directory lock is poisoned.
    pub fn add_user(
        &self,
        name: impl Into<String>,
        email: Option<EmailAddress>,
    ) -> DirectoryResult<(UserId, PartnerId)> {
        let partner_id = self.add_partner(name, email)?;
        let user_id = UserId::new();
        let mut state = self.state.write().map_err(lock_error)?;
        state.users.insert(user_id, partner_id);
        Ok((user_id, partner_id))
    }

    /// Replaces the email address of a partner.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] when the directory lock is poisoned.
    pub fn set_email(
        &self,
        partner_id: PartnerId,
        email: Option<EmailAddress>,
    ) -> DirectoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if let Some(partner) = state.partners.get_mut(&partner_id) {
            partner.email = email;
        }
        Ok(())
    }
}

#[async_trait]
impl Directory for InMemoryDirectory {
    async fn find_user(&self, id: UserId) -> DirectoryResult<Option<UserProfile>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .users
            .get(&id)
            .and_then(|partner_id| state.partners.get(partner_id))
            .map(|partner| UserProfile {
                id,
                partner: partner.clone(),
            }))
    }

    async fn find_partner(&self, id: PartnerId) -> DirectoryResult<Option<PartnerProfile>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.partners.get(&id).cloned())
    }
}

fn lock_error(err: impl ToString) -> DirectoryError {
    DirectoryError::lookup(std::io::Error::other(err.to_string()))
}
