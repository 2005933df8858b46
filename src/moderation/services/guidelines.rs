//! Mailing channel guidelines to members.

use super::mail::{mail_context, render_mail};
use super::moderation::{ChannelModerationService, ModerationServiceError, ModerationServiceResult};
use crate::moderation::{
    domain::{ChannelId, UserId},
    ports::{
        ChannelMessageRepository, ChannelRepository, Directory, MailRecipient, MailState, Mailer,
        ModerationRuleRepository, OutboundMail,
    },
};
use mockable::Clock;
use tracing::info;

impl<CR, RR, MR, D, M, C> ChannelModerationService<CR, RR, MR, D, M, C>
where
    CR: ChannelRepository,
    RR: ModerationRuleRepository,
    MR: ChannelMessageRepository,
    D: Directory,
    M: Mailer,
    C: Clock + Send + Sync,
{
    /// Mails the channel guidelines to every member with an address.
    ///
    /// Members whose address is banned on the channel are skipped. Returns
    /// the queued mails.
    ///
    /// # Errors
    ///
    /// Returns [`ModerationServiceError::NotModerator`] when the sender does
    /// not moderate the channel, [`ModerationServiceError::Template`] when a
    /// template fails to render, or [`ModerationServiceError::Mailer`] when
    /// the queue refuses a mail.
    pub async fn send_guidelines(
        &self,
        channel_id: ChannelId,
        sender: UserId,
    ) -> ModerationServiceResult<Vec<OutboundMail>> {
        let channel = self.load_channel(channel_id).await?;
        Self::ensure_moderator(&channel, sender)?;
        let profile = self
            .directory
            .find_user(sender)
            .await?
            .ok_or(ModerationServiceError::UnknownUser(sender))?;
        let rules = self.load_rules(&channel).await?;

        let subject = render_mail(
            &self.config.guidelines_subject_template,
            &mail_context([("channel_name", Some(channel.name()))]),
        )?;

        let mut mails = Vec::new();
        for &member in channel.members() {
            let Some(partner) = self.directory.find_partner(member).await? else {
                continue;
            };
            let Some(email) = partner.email else {
                continue;
            };
            if rules.is_banned(&email) {
                continue;
            }
            let body = render_mail(
                &self.config.guidelines_body_template,
                &mail_context([
                    ("channel_name", Some(channel.name())),
                    ("member_name", Some(partner.name.as_str())),
                    ("guidelines", Some(channel.guidelines().unwrap_or_default())),
                ]),
            )?;
            let mail = OutboundMail {
                channel_id,
                author_id: Some(profile.partner.id),
                email_from: self.config.catchall_from.clone(),
                recipients: vec![MailRecipient {
                    partner_id: Some(member),
                    email,
                }],
                subject: subject.clone(),
                body,
                state: MailState::Outgoing,
            };
            self.mailer.queue(&mail).await?;
            mails.push(mail);
        }

        info!(channel_id = %channel_id, count = mails.len(), "guidelines sent");
        Ok(mails)
    }
}
