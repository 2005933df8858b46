//! Then steps for channel moderation BDD scenarios.

use super::world::{ModerationWorld, run_async};
use courier::moderation::{
    domain::{ChannelConfigError, EmailAddress, MessageModerationStatus, RuleStatus},
    ports::ChannelMessageRepository,
    services::{ChannelServiceError, PostOutcome},
};
use rstest_bdd_macros::then;

fn last_post(world: &ModerationWorld) -> Result<&PostOutcome, eyre::Report> {
    world
        .last_post
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing post outcome"))
}

#[then(r#"the last post is "{status}""#)]
fn last_post_status(world: &ModerationWorld, status: String) -> Result<(), eyre::Report> {
    let expected = MessageModerationStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let found = last_post(world)?
        .message()
        .map(|message| message.moderation_status());
    eyre::ensure!(
        found == Some(expected),
        "expected status {}, found {found:?}",
        expected.as_str()
    );
    Ok(())
}

#[then("the last post is discarded")]
fn last_post_discarded(world: &ModerationWorld) -> Result<(), eyre::Report> {
    let outcome = last_post(world)?;
    eyre::ensure!(
        *outcome == PostOutcome::Discarded,
        "expected a discarded post, got {outcome:?}"
    );
    Ok(())
}

#[then("the list holds {count:usize} messages")]
fn list_holds(world: &ModerationWorld, count: usize) -> Result<(), eyre::Report> {
    let channel_id = world.channel()?.id();
    let stored = run_async(world.messages.list_for_channel(channel_id))?;
    eyre::ensure!(
        stored.len() == count,
        "expected {count} messages, found {}",
        stored.len()
    );
    Ok(())
}

#[then("the list has {count:usize} pending messages")]
fn pending_messages(world: &ModerationWorld, count: usize) -> Result<(), eyre::Report> {
    let channel_id = world.channel()?.id();
    let pending = run_async(world.admin.pending_count(channel_id))?;
    eyre::ensure!(pending == count, "expected {count} pending, found {pending}");
    Ok(())
}

#[then("every message of the list is accepted")]
fn every_message_accepted(world: &ModerationWorld) -> Result<(), eyre::Report> {
    let channel_id = world.channel()?.id();
    let stored = run_async(world.messages.list_for_channel(channel_id))?;
    eyre::ensure!(!stored.is_empty(), "expected messages on the list");
    eyre::ensure!(
        stored.iter().all(|message| message.is_delivered()),
        "some messages are still held"
    );
    Ok(())
}

#[then("the change is rejected for lack of moderators")]
fn change_rejected(world: &ModerationWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_update
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing update result"))?;
    eyre::ensure!(
        matches!(
            result,
            Err(ChannelServiceError::Config(
                ChannelConfigError::ModerationWithoutModerators
            ))
        ),
        "expected ModerationWithoutModerators, got {result:?}"
    );
    Ok(())
}

#[then(r#""{email}" still moderates the list"#)]
fn still_moderates(world: &mut ModerationWorld, email: String) -> Result<(), eyre::Report> {
    let (user_id, _) = world.person(&email)?;
    let channel_id = world.channel()?.id();
    let stored = run_async(world.admin.find(channel_id))?
        .ok_or_else(|| eyre::eyre!("channel disappeared"))?;
    eyre::ensure!(stored.is_moderated_by(user_id), "{email} no longer moderates");
    Ok(())
}

#[then(r#"the rule for "{email}" is "{status}""#)]
fn rule_status(world: &ModerationWorld, email: String, status: String) -> Result<(), eyre::Report> {
    let expected = RuleStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected rule status in scenario: {err}"))?;
    let address = EmailAddress::parse(&email)?;
    let channel_id = world.channel()?.id();
    let rules = run_async(world.admin.rules(channel_id))?;
    let found = rules
        .iter()
        .find(|rule| *rule.email() == address)
        .map(|rule| rule.status());
    eyre::ensure!(found == Some(expected), "expected {status} for {email}, found {found:?}");
    Ok(())
}

#[then("the list has {count:usize} moderation rules")]
fn rule_count(world: &ModerationWorld, count: usize) -> Result<(), eyre::Report> {
    let channel_id = world.channel()?.id();
    let found = run_async(world.admin.moderation_count(channel_id))?;
    eyre::ensure!(found == count, "expected {count} rules, found {found}");
    Ok(())
}
