//! Moderator review of pending messages.

use super::mail::{mail_context, render_mail};
use super::moderation::{ChannelModerationService, ModerationServiceError, ModerationServiceResult};
use crate::moderation::{
    domain::{
        Channel, ChannelId, ChannelMessage, EmailAddress, MessageId, MessageModerationStatus,
        ModerationDomainError, RuleStatus, UserId,
    },
    ports::{
        ChannelMessageRepository, ChannelRepository, Directory, MailRecipient, MailState, Mailer,
        ModerationRuleRepository, OutboundMail,
    },
};
use mockable::Clock;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{info, warn};

/// Decision taken by a moderator on pending messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationDecision {
    /// Deliver the messages.
    Accept,
    /// Refuse the messages and notify their authors.
    Reject {
        /// Explanation included in the notice.
        reason: Option<String>,
    },
    /// Remove the messages silently.
    Discard,
    /// Allow the authors' addresses, then accept their pending messages.
    Allow,
    /// Ban the authors' addresses, then discard their pending messages.
    Ban,
}

/// Counts of messages affected by a review.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModerationSummary {
    /// Messages delivered.
    pub accepted: usize,
    /// Messages refused.
    pub rejected: usize,
    /// Messages removed.
    pub discarded: usize,
    /// Address rules created or updated.
    pub rules_updated: usize,
}

impl<CR, RR, MR, D, M, C> ChannelModerationService<CR, RR, MR, D, M, C>
where
    CR: ChannelRepository,
    RR: ModerationRuleRepository,
    MR: ChannelMessageRepository,
    D: Directory,
    M: Mailer,
    C: Clock + Send + Sync,
{
    /// Applies a moderator decision to pending messages.
    ///
    /// Every message is checked before any is changed: the reviewer must
    /// moderate each message's channel and each message must still be
    /// pending.
    ///
    /// # Errors
    ///
    /// Returns [`ModerationServiceError::NotModerator`] when the reviewer
    /// does not moderate a targeted channel,
    /// [`ModerationServiceError::MessageNotFound`] for unknown messages, or
    /// [`ModerationServiceError::Domain`] when a message is no longer
    /// pending.
    pub async fn moderate(
        &self,
        reviewer: UserId,
        message_ids: &[MessageId],
        decision: ModerationDecision,
    ) -> ModerationServiceResult<ModerationSummary> {
        let (messages, channels) = self.load_reviewable(reviewer, message_ids).await?;
        let mut summary = ModerationSummary::default();

        match decision {
            ModerationDecision::Accept => {
                for message in messages {
                    self.accept_one(&channels, message).await?;
                    summary.accepted += 1;
                }
            }
            ModerationDecision::Reject { reason } => {
                for mut message in messages {
                    message.reject(&*self.clock)?;
                    self.messages.update(&message).await?;
                    self.notify_rejection(&channels, &message, reason.as_deref())
                        .await;
                    summary.rejected += 1;
                }
            }
            ModerationDecision::Discard => {
                for message in messages {
                    self.messages.delete(message.id()).await?;
                    summary.discarded += 1;
                }
            }
            ModerationDecision::Allow => {
                self.apply_rule_decision(&channels, messages, RuleStatus::Allow, &mut summary)
                    .await?;
            }
            ModerationDecision::Ban => {
                self.apply_rule_decision(&channels, messages, RuleStatus::Ban, &mut summary)
                    .await?;
            }
        }

        info!(
            user_id = %reviewer,
            accepted = summary.accepted,
            rejected = summary.rejected,
            discarded = summary.discarded,
            rules_updated = summary.rules_updated,
            "moderation applied"
        );
        Ok(summary)
    }

    /// Lists the messages waiting for review on a channel.
    ///
    /// # Errors
    ///
    /// Returns [`ModerationServiceError::NotModerator`] when the reviewer
    /// does not moderate the channel.
    pub async fn pending_messages(
        &self,
        reviewer: UserId,
        channel_id: ChannelId,
    ) -> ModerationServiceResult<Vec<ChannelMessage>> {
        let channel = self.load_channel(channel_id).await?;
        Self::ensure_moderator(&channel, reviewer)?;
        Ok(self.messages.list_pending(channel_id).await?)
    }

    async fn load_reviewable(
        &self,
        reviewer: UserId,
        message_ids: &[MessageId],
    ) -> ModerationServiceResult<(Vec<ChannelMessage>, HashMap<ChannelId, Channel>)> {
        let mut channels = HashMap::new();
        let mut messages = Vec::with_capacity(message_ids.len());
        let mut seen = HashSet::new();
        for &id in message_ids {
            if !seen.insert(id) {
                continue;
            }
            let message = self
                .messages
                .find_by_id(id)
                .await?
                .ok_or(ModerationServiceError::MessageNotFound(id))?;
            if !channels.contains_key(&message.channel_id()) {
                let channel = self.load_channel(message.channel_id()).await?;
                channels.insert(channel.id(), channel);
            }
            if let Some(channel) = channels.get(&message.channel_id()) {
                Self::ensure_moderator(channel, reviewer)?;
            }
            if !message.is_pending() {
                return Err(ModerationDomainError::InvalidModerationTransition {
                    message_id: id,
                    from: message.moderation_status(),
                    to: MessageModerationStatus::Accepted,
                }
                .into());
            }
            messages.push(message);
        }
        Ok((messages, channels))
    }

    async fn accept_one(
        &self,
        channels: &HashMap<ChannelId, Channel>,
        mut message: ChannelMessage,
    ) -> ModerationServiceResult<()> {
        message.accept(&*self.clock)?;
        self.messages.update(&message).await?;
        let Some(channel) = channels.get(&message.channel_id()) else {
            return Ok(());
        };
        if let Err(err) = self.fan_out(channel, &message).await {
            warn!(
                message_id = %message.id(),
                error = %err,
                "mailing-list delivery failed"
            );
        }
        Ok(())
    }

    async fn apply_rule_decision(
        &self,
        channels: &HashMap<ChannelId, Channel>,
        messages: Vec<ChannelMessage>,
        status: RuleStatus,
        summary: &mut ModerationSummary,
    ) -> ModerationServiceResult<()> {
        let mut by_channel: BTreeMap<ChannelId, Vec<EmailAddress>> = BTreeMap::new();
        for message in &messages {
            if let Some(email) = message.author().email() {
                let emails = by_channel.entry(message.channel_id()).or_default();
                if !emails.contains(email) {
                    emails.push(email.clone());
                }
            }
        }

        let mut targets = messages;
        let mut targeted: HashSet<MessageId> = targets.iter().map(ChannelMessage::id).collect();
        for (channel_id, emails) in &by_channel {
            let rules = self
                .rules
                .upsert(*channel_id, emails, status, self.clock.utc())
                .await?;
            summary.rules_updated += rules.len();
            for pending in self.messages.list_pending(*channel_id).await? {
                let from_author = pending
                    .author()
                    .email()
                    .is_some_and(|email| emails.contains(email));
                if from_author && targeted.insert(pending.id()) {
                    targets.push(pending);
                }
            }
        }

        for message in targets {
            match status {
                RuleStatus::Allow => {
                    self.accept_one(channels, message).await?;
                    summary.accepted += 1;
                }
                RuleStatus::Ban => {
                    self.messages.delete(message.id()).await?;
                    summary.discarded += 1;
                }
            }
        }
        Ok(())
    }

    async fn notify_rejection(
        &self,
        channels: &HashMap<ChannelId, Channel>,
        message: &ChannelMessage,
        reason: Option<&str>,
    ) {
        let Some(email) = message.author().email() else {
            return;
        };
        let Some(channel) = channels.get(&message.channel_id()) else {
            return;
        };
        let context = mail_context([
            ("channel_name", Some(channel.name())),
            ("reason", reason),
            ("original_body", Some(message.body())),
        ]);
        let rendered = render_mail(&self.config.rejection_subject_template, &context).and_then(
            |subject| {
                render_mail(&self.config.rejection_body_template, &context)
                    .map(|body| (subject, body))
            },
        );
        let (subject, body) = match rendered {
            Ok(parts) => parts,
            Err(err) => {
                warn!(message_id = %message.id(), error = %err, "rejection notice not rendered");
                return;
            }
        };
        let mail = OutboundMail {
            channel_id: channel.id(),
            author_id: None,
            email_from: self.config.catchall_from.clone(),
            recipients: vec![MailRecipient {
                partner_id: message.author().partner_id(),
                email: email.clone(),
            }],
            subject,
            body,
            state: MailState::Outgoing,
        };
        if let Err(err) = self.mailer.queue(&mail).await {
            warn!(message_id = %message.id(), error = %err, "rejection notice not queued");
        }
    }
}
