//! Given steps for channel moderation BDD scenarios.

use super::world::{ModerationWorld, run_async};
use courier::moderation::{
    domain::{ChannelChange, NewChannel, RuleStatus},
    services::PostMessageRequest,
};
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"a moderated mailing list moderated by "{email}""#)]
fn moderated_list(world: &mut ModerationWorld, email: String) -> Result<(), eyre::Report> {
    let (user_id, partner_id) = world.person(&email)?;
    let candidate = run_async(world.admin.moderator_candidate(user_id))
        .wrap_err("resolve moderator candidate")?;
    let channel = run_async(
        world.admin.create(
            NewChannel::new("Moderation")
                .with_email_send(true)
                .with_moderation(true)
                .with_members([partner_id])
                .with_moderator(candidate),
        ),
    )
    .wrap_err("create moderated mailing list")?;
    world.channel = Some(channel);
    Ok(())
}

#[given(r#""{email}" is a member of the list"#)]
fn member_of_list(world: &mut ModerationWorld, email: String) -> Result<(), eyre::Report> {
    let (_, partner_id) = world.person(&email)?;
    let channel_id = world.channel()?.id();
    let channel = run_async(
        world
            .admin
            .update(channel_id, [ChannelChange::AddMember(partner_id)]),
    )
    .wrap_err("add member to list")?;
    world.channel = Some(channel);
    Ok(())
}

fn set_rule(
    world: &ModerationWorld,
    addresses: &str,
    status: RuleStatus,
) -> Result<(), eyre::Report> {
    let channel_id = world.channel()?.id();
    let emails: Vec<&str> = addresses.split(',').map(str::trim).collect();
    run_async(world.admin.update_moderation(channel_id, emails, status))
        .wrap_err("update moderation rules")?;
    Ok(())
}

#[given(r#""{addresses}" is banned on the list"#)]
fn banned_on_list(world: &mut ModerationWorld, addresses: String) -> Result<(), eyre::Report> {
    set_rule(world, &addresses, RuleStatus::Ban)
}

#[given(r#""{addresses}" is allowed on the list"#)]
fn allowed_on_list(world: &mut ModerationWorld, addresses: String) -> Result<(), eyre::Report> {
    set_rule(world, &addresses, RuleStatus::Allow)
}

#[given(r#"member "{email}" has posted "{body}""#)]
fn member_has_posted(
    world: &mut ModerationWorld,
    email: String,
    body: String,
) -> Result<(), eyre::Report> {
    let (_, partner_id) = world.person(&email)?;
    let channel_id = world.channel()?.id();
    let outcome = run_async(
        world
            .moderation
            .post(channel_id, PostMessageRequest::from_partner(partner_id, body)),
    )
    .wrap_err("post setup message")?;
    world.last_post = Some(outcome);
    Ok(())
}
