//! Mail template rendering shared by moderation services.

use minijinja::Environment;
use serde_json::{Map, Value};
use thiserror::Error;

/// A mail template failed to render.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("failed to render mail template: {reason}")]
pub struct MailTemplateError {
    /// Renderer message.
    pub reason: String,
}

/// Builds a template context from string pairs.
pub(super) fn mail_context<'a>(
    pairs: impl IntoIterator<Item = (&'a str, Option<&'a str>)>,
) -> Map<String, Value> {
    pairs
        .into_iter()
        .map(|(key, text)| {
            let json = text.map_or(Value::Null, |content| Value::String(content.to_owned()));
            (key.to_owned(), json)
        })
        .collect()
}

pub(super) fn render_mail(
    template: &str,
    context: &Map<String, Value>,
) -> Result<String, MailTemplateError> {
    Environment::new()
        .render_str(template, context)
        .map_err(|error| MailTemplateError {
            reason: error.to_string(),
        })
}
