//! Given steps for SMS broadcast BDD scenarios.

use super::world::BroadcastWorld;
use courier::broadcast::domain::{Locale, Recipient, SmsTemplate, TargetRecord};
use eyre::WrapErr;
use rstest_bdd_macros::given;

fn customer(name: &str, mobile: &str) -> TargetRecord {
    TargetRecord::new(name).with_recipient(Recipient::new(name).with_mobile(mobile))
}

fn blacklist_number(world: &BroadcastWorld, raw: &str) -> Result<(), eyre::Report> {
    let number = world
        .composer()?
        .sanitizer()
        .sanitize(raw)
        .wrap_err("sanitise blacklisted number")?;
    world.blacklist.add(number)?;
    Ok(())
}

#[given(r#"a composer completing national numbers with "{code}""#)]
fn composer_with_code(world: &mut BroadcastWorld, code: String) -> Result<(), eyre::Report> {
    world.configure(&code).wrap_err("configure composer")?;
    Ok(())
}

#[given("{count:usize} records whose numbers are blacklisted")]
fn blacklisted_records(world: &mut BroadcastWorld, count: usize) -> Result<(), eyre::Report> {
    for n in 0..count {
        let number = format!("0470 00 10 {n:02}");
        blacklist_number(world, &number)?;
        world.records.push(customer(&format!("Opted out {n}"), &number));
    }
    Ok(())
}

#[given(r#"{count:usize} records sharing the number "{number}""#)]
fn shared_records(world: &mut BroadcastWorld, count: usize, number: String) {
    for n in 0..count {
        world
            .records
            .push(customer(&format!("Household {n}"), &number));
    }
}

#[given("{count:usize} records with distinct numbers")]
fn distinct_records(world: &mut BroadcastWorld, count: usize) {
    for n in 0..count {
        world
            .records
            .push(customer(&format!("Single {n}"), &format!("0470 00 20 {n:02}")));
    }
}

#[given(r#"a record "{name}" with mobile "{mobile}""#)]
fn record_with_mobile(world: &mut BroadcastWorld, name: String, mobile: String) {
    world.records.push(customer(&name, &mobile));
}

#[given(r#"the record "{name}" speaks "{locale}""#)]
fn record_speaks(
    world: &mut BroadcastWorld,
    name: String,
    locale: String,
) -> Result<(), eyre::Report> {
    let parsed = Locale::parse(&locale)?;
    let record = world
        .records
        .iter_mut()
        .find(|record| record.display_name() == name)
        .ok_or_else(|| eyre::eyre!("unknown record {name}"))?;
    let recipient = record
        .recipient()
        .cloned()
        .ok_or_else(|| eyre::eyre!("record {name} has no contact"))?
        .with_locale(parsed);
    *record = record.clone().with_recipient(recipient);
    Ok(())
}

#[given(r#"the number "{number}" is blacklisted"#)]
fn number_blacklisted(world: &mut BroadcastWorld, number: String) -> Result<(), eyre::Report> {
    blacklist_number(world, &number)
}

#[given(r#"a template "{body}" translated to "{locale}" as "{translation}""#)]
fn translated_template(
    world: &mut BroadcastWorld,
    body: String,
    locale: String,
    translation: String,
) -> Result<(), eyre::Report> {
    let template = SmsTemplate::new("Scenario template", body)?
        .with_translation(Locale::parse(&locale)?, translation)?;
    world.template_id = Some(world.templates.insert(template)?);
    Ok(())
}
