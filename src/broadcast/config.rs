//! Configuration for SMS broadcasts.

use serde::Deserialize;

/// Defaults applied when a compose request leaves a switch unset.
///
/// # Examples
///
/// ```
/// use courier::broadcast::BroadcastConfig;
///
/// let loaded: BroadcastConfig =
///     serde_json::from_str(r#"{"default_calling_code": "32", "keep_log": false}"#).unwrap();
/// assert_eq!(loaded.default_calling_code.as_deref(), Some("32"));
/// assert!(!loaded.keep_log);
/// assert!(loaded.use_blacklist);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BroadcastConfig {
    /// Calling code completing national numbers, without `+`. National
    /// numbers are invalid when unset.
    pub default_calling_code: Option<String>,
    /// Cancel blacklisted destinations in mass mode.
    pub use_blacklist: bool,
    /// Log mass SMS on their records.
    pub keep_log: bool,
    /// Cancel repeated destinations in mass mode.
    pub dedupe: bool,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            default_calling_code: None,
            use_blacklist: true,
            keep_log: true,
            dedupe: true,
        }
    }
}

impl BroadcastConfig {
    /// Returns the default configuration completing national numbers with
    /// `code`.
    #[must_use]
    pub fn with_calling_code(code: impl Into<String>) -> Self {
        Self {
            default_calling_code: Some(code.into()),
            ..Self::default()
        }
    }
}
