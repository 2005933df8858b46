//! Adapter contract tests for the in-memory moderation repositories.

use crate::in_memory::helpers::{ModerationStack, moderation_stack};
use chrono::{Duration, Utc};
use courier::moderation::{
    domain::{
        Channel, ChannelId, ChannelMessage, EmailAddress, MessageAuthor, MessageId, MessageKind,
        MessageModerationStatus, NewChannel, NewChannelMessage, RuleStatus,
    },
    ports::{
        ChannelMessageRepository, ChannelRepository, ModerationRepositoryError,
        ModerationRuleRepository,
    },
};
use mockable::DefaultClock;
use rstest::rstest;

fn email(raw: &str) -> EmailAddress {
    EmailAddress::parse(raw).expect("valid test email")
}

fn pending(channel_id: ChannelId, author: &str) -> ChannelMessage {
    ChannelMessage::new(
        NewChannelMessage {
            channel_id,
            author: MessageAuthor::external(email(author)),
            kind: MessageKind::Email,
            body: "Hello".to_owned(),
            moderation_status: MessageModerationStatus::PendingModeration,
        },
        &DefaultClock,
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn channels_are_stored_once(moderation_stack: ModerationStack) {
    let channel = Channel::create(NewChannel::new("General"), &DefaultClock).expect("channel");
    let repo = &moderation_stack.channels;

    repo.store(&channel).await.expect("first store");
    let duplicate = repo.store(&channel).await;
    assert!(matches!(
        duplicate,
        Err(ModerationRepositoryError::DuplicateChannel(id)) if id == channel.id()
    ));

    repo.delete(channel.id()).await.expect("delete");
    assert_eq!(repo.find_by_id(channel.id()).await.expect("lookup"), None);
    assert!(matches!(
        repo.update(&channel).await,
        Err(ModerationRepositoryError::ChannelNotFound(_))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn moderated_channels_are_listed_per_user(moderation_stack: ModerationStack) {
    let (user_id, partner_id) = moderation_stack
        .user("Employee", Some("employee@example.com"))
        .expect("user");
    let candidate = moderation_stack
        .admin
        .moderator_candidate(user_id)
        .await
        .expect("candidate");
    let moderated = moderation_stack
        .admin
        .create(
            NewChannel::new("List")
                .with_email_send(true)
                .with_moderation(true)
                .with_members([partner_id])
                .with_moderator(candidate),
        )
        .await
        .expect("moderated channel");
    moderation_stack
        .admin
        .create(NewChannel::new("Chat").with_members([partner_id]))
        .await
        .expect("chat channel");

    let listed = moderation_stack
        .channels
        .list_moderated_by(user_id)
        .await
        .expect("listing");
    assert_eq!(listed, vec![moderated]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rule_upserts_only_touch_changed_statuses(moderation_stack: ModerationStack) {
    let channel_id = ChannelId::new();
    let repo = &moderation_stack.rules;
    let earlier = Utc::now() - Duration::minutes(5);
    let later = Utc::now();

    repo.upsert(
        channel_id,
        &[email("a@example.com"), email("b@example.com")],
        RuleStatus::Ban,
        earlier,
    )
    .await
    .expect("initial ban");
    let touched = repo
        .upsert(
            channel_id,
            &[email("a@example.com"), email("b@example.com")],
            RuleStatus::Allow,
            later,
        )
        .await
        .expect("switch to allow");
    let untouched = repo
        .upsert(channel_id, &[email("a@example.com")], RuleStatus::Allow, Utc::now())
        .await
        .expect("reapply allow");

    assert!(touched.iter().all(|rule| rule.status() == RuleStatus::Allow));
    assert!(touched.iter().all(|rule| rule.created_at() == earlier));
    assert!(touched.iter().all(|rule| rule.updated_at() == later));
    assert_eq!(
        untouched.first().map(|rule| rule.updated_at()),
        Some(later)
    );
    assert_eq!(repo.count_for_channel(channel_id).await.expect("count"), 2);
    assert_eq!(repo.count_for_channel(ChannelId::new()).await.expect("count"), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn pending_messages_are_counted_across_channels(moderation_stack: ModerationStack) {
    let repo = &moderation_stack.messages;
    let first = ChannelId::new();
    let second = ChannelId::new();
    let mut accepted = pending(first, "a@example.com");
    accepted.accept(&DefaultClock).expect("accept");

    for message in [
        pending(first, "a@example.com"),
        pending(second, "b@example.com"),
        pending(second, "c@example.com"),
        accepted,
    ] {
        repo.store(&message).await.expect("store");
    }

    assert_eq!(repo.count_pending(&[first]).await.expect("count"), 1);
    assert_eq!(repo.count_pending(&[first, second]).await.expect("count"), 3);
    assert_eq!(repo.count_pending(&[]).await.expect("count"), 0);
    assert_eq!(repo.list_pending(second).await.expect("list").len(), 2);
    assert_eq!(repo.list_for_channel(first).await.expect("list").len(), 2);

    let missing = MessageId::new();
    assert!(matches!(
        repo.delete(missing).await,
        Err(ModerationRepositoryError::MessageNotFound(id)) if id == missing
    ));
}
