//! End-to-end moderation flows through the public services.

use crate::in_memory::helpers::{ModerationStack, moderation_stack};
use courier::moderation::{
    domain::{
        Channel, ChannelChange, MessageModerationStatus, NewChannel, PartnerId, RuleStatus, UserId,
    },
    ports::MailState,
    services::{ModerationDecision, PostMessageRequest, PostOutcome},
};
use rstest::rstest;

struct MailingList {
    channel: Channel,
    moderator: (UserId, PartnerId),
    member: (UserId, PartnerId),
}

async fn mailing_list(stack: &ModerationStack) -> Result<MailingList, eyre::Report> {
    let moderator = stack.user("Employee", Some("employee@example.com"))?;
    let member = stack.user("Admin", Some("admin@example.com"))?;
    let candidate = stack.admin.moderator_candidate(moderator.0).await?;
    let channel = stack
        .admin
        .create(
            NewChannel::new("Moderation")
                .with_email_send(true)
                .with_moderation(true)
                .with_members([moderator.1, member.1])
                .with_moderator(candidate),
        )
        .await?;
    Ok(MailingList {
        channel,
        moderator,
        member,
    })
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_banned_sender_never_reaches_the_channel(
    moderation_stack: ModerationStack,
) -> Result<(), eyre::Report> {
    let list = mailing_list(&moderation_stack).await?;
    let channel_id = list.channel.id();
    moderation_stack
        .admin
        .update_moderation(channel_id, ["spammer@example.com"], RuleStatus::Ban)
        .await?;

    let outcome = moderation_stack
        .moderation
        .post(
            channel_id,
            PostMessageRequest::from_email("Spammer <SPAMMER@example.com>", "Buy now"),
        )
        .await?;

    eyre::ensure!(outcome == PostOutcome::Discarded, "banned post was kept");
    eyre::ensure!(
        moderation_stack.admin.pending_count(channel_id).await? == 0,
        "banned post is pending"
    );
    eyre::ensure!(moderation_stack.mailer.queued().is_empty(), "banned post was mailed");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_moderated_post_flows_from_pending_to_members(
    moderation_stack: ModerationStack,
) -> Result<(), eyre::Report> {
    let list = mailing_list(&moderation_stack).await?;
    let channel_id = list.channel.id();

    let outcome = moderation_stack
        .moderation
        .post(channel_id, PostMessageRequest::from_email("guest@example.com", "Hi all"))
        .await?;
    let message = outcome
        .message()
        .ok_or_else(|| eyre::eyre!("pending post should be stored"))?;
    eyre::ensure!(
        message.moderation_status() == MessageModerationStatus::PendingModeration,
        "unknown senders should wait for review"
    );
    eyre::ensure!(
        moderation_stack.admin.moderation_counter(list.moderator.0).await? == 1,
        "moderator should see one pending message"
    );

    let summary = moderation_stack
        .moderation
        .moderate(list.moderator.0, &[message.id()], ModerationDecision::Allow)
        .await?;

    eyre::ensure!(summary.accepted == 1, "allowing should accept the backlog");
    eyre::ensure!(
        moderation_stack.admin.moderation_counter(list.moderator.0).await? == 0,
        "counter should drop once reviewed"
    );
    let queued = moderation_stack.mailer.queued();
    let mail = queued
        .first()
        .ok_or_else(|| eyre::eyre!("accepted post should be mailed"))?;
    let mut recipients: Vec<&str> = mail.recipients.iter().map(|r| r.email.as_str()).collect();
    recipients.sort_unstable();
    eyre::ensure!(
        recipients == vec!["admin@example.com", "employee@example.com"],
        "unexpected recipients {recipients:?}"
    );
    eyre::ensure!(mail.state == MailState::Outgoing, "mail should be queued");

    let follow_up = moderation_stack
        .moderation
        .post(channel_id, PostMessageRequest::from_email("guest@example.com", "Thanks"))
        .await?;
    eyre::ensure!(
        follow_up.message().map(|m| m.moderation_status())
            == Some(MessageModerationStatus::Accepted),
        "allowed sender should bypass review"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn the_last_moderator_cannot_be_removed(
    moderation_stack: ModerationStack,
) -> Result<(), eyre::Report> {
    let list = mailing_list(&moderation_stack).await?;
    let channel_id = list.channel.id();

    let result = moderation_stack
        .admin
        .update(channel_id, [ChannelChange::RemoveModerator(list.moderator.0)])
        .await;

    eyre::ensure!(result.is_err(), "removal should fail");
    eyre::ensure!(
        moderation_stack.admin.is_moderator(list.moderator.0).await?,
        "moderator set should be unchanged"
    );
    eyre::ensure!(
        !moderation_stack.admin.is_moderator(list.member.0).await?,
        "members are not moderators"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_channel_keeps_other_channels(
    moderation_stack: ModerationStack,
) -> Result<(), eyre::Report> {
    let list = mailing_list(&moderation_stack).await?;
    let chat = moderation_stack
        .admin
        .create(NewChannel::new("Chat").with_members([list.member.1]))
        .await?;

    moderation_stack.admin.delete(list.channel.id()).await?;

    eyre::ensure!(
        moderation_stack.admin.find(list.channel.id()).await?.is_none(),
        "deleted channel should be gone"
    );
    eyre::ensure!(
        moderation_stack.admin.find(chat.id()).await?.is_some(),
        "other channels should remain"
    );
    eyre::ensure!(
        !moderation_stack.admin.is_moderator(list.moderator.0).await?,
        "moderation ends with the channel"
    );
    Ok(())
}
