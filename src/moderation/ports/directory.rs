//! Directory port resolving users and partners to contact details.

use crate::moderation::domain::{EmailAddress, PartnerId, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for directory lookups.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Contact details of a partner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnerProfile {
    /// Partner identifier.
    pub id: PartnerId,
    /// Display name.
    pub name: String,
    /// Email address, when the partner has one.
    pub email: Option<EmailAddress>,
}

/// Login user with the partner it acts as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    /// User identifier.
    pub id: UserId,
    /// Partner the user posts and receives mail as.
    pub partner: PartnerProfile,
}

/// Read-only lookup of users and partners.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Finds a user by identifier.
    async fn find_user(&self, id: UserId) -> DirectoryResult<Option<UserProfile>>;

    /// Finds a partner by identifier.
    async fn find_partner(&self, id: PartnerId) -> DirectoryResult<Option<PartnerProfile>>;
}

/// Errors returned by directory implementations.
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    /// Lookup backend failure.
    #[error("directory lookup failed: {0}")]
    Lookup(Arc<dyn std::error::Error + Send + Sync>),
}

impl DirectoryError {
    /// Wraps a lookup failure.
    pub fn lookup(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Lookup(Arc::new(err))
    }
}
