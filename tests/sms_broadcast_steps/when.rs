//! When steps for SMS broadcast BDD scenarios.

use super::world::{BroadcastWorld, run_async};
use courier::broadcast::{domain::CompositionMode, services::ComposeRequest};
use rstest_bdd_macros::when;

fn send(world: &mut BroadcastWorld, request: ComposeRequest) -> Result<(), eyre::Report> {
    let result = run_async(world.composer()?.send(request));
    world.last_report = Some(result);
    Ok(())
}

#[when(r#"the SMS "{body}" is sent"#)]
fn sms_is_sent(world: &mut BroadcastWorld, body: String) -> Result<(), eyre::Report> {
    let request = ComposeRequest::for_records(world.records.clone()).with_body(body);
    send(world, request)
}

#[when(r#"the SMS "{body}" is mass-sent to the numbers "{numbers}""#)]
fn sms_is_sent_to_numbers(
    world: &mut BroadcastWorld,
    body: String,
    numbers: String,
) -> Result<(), eyre::Report> {
    let request = ComposeRequest::for_records(world.records.clone())
        .with_mode(CompositionMode::Mass)
        .with_numbers(&numbers)
        .with_body(body);
    send(world, request)
}

#[when("the template is sent")]
fn template_is_sent(world: &mut BroadcastWorld) -> Result<(), eyre::Report> {
    let template_id = world
        .template_id
        .ok_or_else(|| eyre::eyre!("missing template in scenario world"))?;
    let request = ComposeRequest::for_records(world.records.clone()).with_template(template_id);
    send(world, request)
}
