//! When steps for channel moderation BDD scenarios.

use super::world::{ModerationWorld, run_async};
use courier::moderation::{
    domain::ChannelChange,
    services::PostMessageRequest,
};
use eyre::WrapErr;
use rstest_bdd_macros::when;

fn post(world: &mut ModerationWorld, request: PostMessageRequest) -> Result<(), eyre::Report> {
    let channel_id = world.channel()?.id();
    let outcome = run_async(world.moderation.post(channel_id, request))
        .wrap_err("post message")?;
    world.last_post = Some(outcome);
    Ok(())
}

#[when(r#"member "{email}" posts "{body}""#)]
fn member_posts(
    world: &mut ModerationWorld,
    email: String,
    body: String,
) -> Result<(), eyre::Report> {
    let (_, partner_id) = world.person(&email)?;
    post(world, PostMessageRequest::from_partner(partner_id, body))
}

#[when(r#""{name}" <{address}> mails "{body}""#)]
fn external_mails(
    world: &mut ModerationWorld,
    name: String,
    address: String,
    body: String,
) -> Result<(), eyre::Report> {
    post(
        world,
        PostMessageRequest::from_email(format!("\"{name}\" <{address}>"), body),
    )
}

#[when(r#"the system notifies "{body}""#)]
fn system_notifies(world: &mut ModerationWorld, body: String) -> Result<(), eyre::Report> {
    post(world, PostMessageRequest::notification(body))
}

#[when("moderation is disabled on the list")]
fn disable_moderation(world: &mut ModerationWorld) -> Result<(), eyre::Report> {
    let channel_id = world.channel()?.id();
    let channel = run_async(world.admin.update(
        channel_id,
        [
            ChannelChange::SetModeration(false),
            ChannelChange::ClearModerators,
        ],
    ))
    .wrap_err("disable moderation")?;
    world.channel = Some(channel);
    Ok(())
}

#[when(r#"the moderator "{email}" is removed from the list"#)]
fn remove_moderator(world: &mut ModerationWorld, email: String) -> Result<(), eyre::Report> {
    let (user_id, _) = world.person(&email)?;
    let channel_id = world.channel()?.id();
    let result = run_async(
        world
            .admin
            .update(channel_id, [ChannelChange::RemoveModerator(user_id)]),
    );
    world.last_update = Some(result);
    Ok(())
}
