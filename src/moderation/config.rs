//! Configuration for moderation mail.
//!
//! Subjects and bodies are `minijinja` templates rendered against the
//! channel being moderated.

use serde::Deserialize;

/// Settings for the mail sent by moderation services.
///
/// # Examples
///
/// ```
/// use courier::moderation::ModerationConfig;
///
/// let config = ModerationConfig::default();
/// assert!(config.guidelines_subject_template.contains("channel_name"));
///
/// let loaded: ModerationConfig =
///     serde_json::from_str(r#"{"catchall_from": "list@example.org"}"#).unwrap();
/// assert_eq!(loaded.catchall_from, "list@example.org");
/// assert_eq!(
///     loaded.rejection_subject_template,
///     ModerationConfig::default().rejection_subject_template
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ModerationConfig {
    /// Sender address of channel system mail.
    pub catchall_from: String,
    /// Subject of the guidelines mail. Context: `channel_name`.
    pub guidelines_subject_template: String,
    /// Body of the guidelines mail. Context: `channel_name`, `member_name`,
    /// `guidelines`.
    pub guidelines_body_template: String,
    /// Subject of the rejection notice. Context: `channel_name`.
    pub rejection_subject_template: String,
    /// Body of the rejection notice. Context: `channel_name`, `reason`,
    /// `original_body`.
    pub rejection_body_template: String,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            catchall_from: "\"Notifications\" <notifications@localhost>".to_owned(),
            guidelines_subject_template: "Guidelines of channel {{ channel_name }}".to_owned(),
            guidelines_body_template: concat!(
                "Hello {{ member_name }},\n\n",
                "Please read the guidelines of channel {{ channel_name }}:\n\n",
                "{{ guidelines }}\n"
            )
            .to_owned(),
            rejection_subject_template: "Your message on {{ channel_name }} was rejected"
                .to_owned(),
            rejection_body_template: concat!(
                "{% if reason %}{{ reason }}\n\n{% endif %}",
                "Original message:\n{{ original_body }}\n"
            )
            .to_owned(),
        }
    }
}

impl ModerationConfig {
    /// Returns the default configuration sending from `catchall_from`.
    #[must_use]
    pub fn with_catchall(catchall_from: impl Into<String>) -> Self {
        Self {
            catchall_from: catchall_from.into(),
            ..Self::default()
        }
    }
}
