//! SMS body rendering.

use crate::broadcast::domain::{Locale, Recipient, TargetRecord};
use minijinja::Environment;
use serde_json::{Map, Value, json};
use thiserror::Error;

/// An SMS body failed to render.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("failed to render SMS body: {reason}")]
pub struct SmsRenderError {
    /// Renderer message.
    pub reason: String,
}

/// Renders `body` with `object` bound to `record`. Typed numbers get an
/// empty `object`, so its attributes render as empty strings.
pub(super) fn render_sms(
    env: &Environment<'_>,
    body: &str,
    record: Option<&TargetRecord>,
) -> Result<String, SmsRenderError> {
    let object = record.map_or_else(|| Value::Object(Map::new()), record_context);
    env.render_str(body, json!({ "object": object }))
        .map_err(|error| SmsRenderError {
            reason: error.to_string(),
        })
}

fn record_context(record: &TargetRecord) -> Value {
    let mut object = Map::new();
    object.insert("id".to_owned(), json!(record.id().to_string()));
    object.insert("display_name".to_owned(), json!(record.display_name()));
    object.insert("fields".to_owned(), json!(record.fields()));
    if let Some(recipient) = record.recipient() {
        object.insert(
            "recipient".to_owned(),
            json!({
                "name": recipient.name(),
                "locale": recipient.locale().map(Locale::as_str),
            }),
        );
    }
    Value::Object(object)
}

/// Locale of the contact linked to `record`.
pub(super) fn record_locale(record: Option<&TargetRecord>) -> Option<&Locale> {
    record
        .and_then(TargetRecord::recipient)
        .and_then(Recipient::locale)
}
