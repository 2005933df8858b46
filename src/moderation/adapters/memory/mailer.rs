//! Mailer that keeps queued mail in memory for inspection.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::moderation::ports::{Mailer, MailerError, MailerResult, OutboundMail};

/// Thread-safe recording mailer.
#[derive(Debug, Clone, Default)]
pub struct RecordingMailer {
    queued: Arc<RwLock<Vec<OutboundMail>>>,
}

impl RecordingMailer {
    /// Creates an empty mailer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every mail queued so far, oldest first.
    #[must_use]
    pub fn queued(&self) -> Vec<OutboundMail> {
        self.queued
            .read()
            .map(|queued| queued.clone())
            .unwrap_or_default()
    }

    /// Forgets every queued mail.
    pub fn clear(&self) {
        if let Ok(mut queued) = self.queued.write() {
            queued.clear();
        }
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn queue(&self, mail: &OutboundMail) -> MailerResult<()> {
        if mail.recipients.is_empty() {
            return Err(MailerError::NoRecipient(mail.subject.clone()));
        }
        let mut queued = self
            .queued
            .write()
            .map_err(|err| MailerError::transport(std::io::Error::other(err.to_string())))?;
        queued.push(mail.clone());
        Ok(())
    }
}
