//! Outbound mail port used for fan-out, guidelines and rejection notices.

use crate::moderation::domain::{ChannelId, EmailAddress, PartnerId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Result type for mailer operations.
pub type MailerResult<T> = Result<T, MailerError>;

/// Delivery state of a queued mail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MailState {
    /// Waiting in the outgoing queue.
    Outgoing,
    /// Handed over to the mail server.
    Sent,
}

/// A recipient of an outbound mail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailRecipient {
    /// Recipient partner, when known.
    pub partner_id: Option<PartnerId>,
    /// Recipient address.
    pub email: EmailAddress,
}

/// Mail queued for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMail {
    /// Channel the mail originates from.
    pub channel_id: ChannelId,
    /// Author partner, `None` for system mail.
    pub author_id: Option<PartnerId>,
    /// Formatted sender address.
    pub email_from: String,
    /// Recipients.
    pub recipients: Vec<MailRecipient>,
    /// Subject line.
    pub subject: String,
    /// Body text.
    pub body: String,
    /// Delivery state.
    pub state: MailState,
}

/// Outbound mail queue.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Queues a mail for delivery.
    async fn queue(&self, mail: &OutboundMail) -> MailerResult<()>;
}

/// Errors returned by mailer implementations.
#[derive(Debug, Clone, Error)]
pub enum MailerError {
    /// The mail has no recipient.
    #[error("mail '{0}' has no recipient")]
    NoRecipient(String),

    /// Transport failure.
    #[error("mail transport failure: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl MailerError {
    /// Wraps a transport failure.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
