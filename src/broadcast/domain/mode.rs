//! Composition modes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a broadcast addresses its records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionMode {
    /// One SMS posted on a single record's thread. Never deduplicated nor
    /// checked against the blacklist.
    Comment,
    /// One SMS per record, deduplicated and blacklist-checked on request.
    Mass,
}

impl CompositionMode {
    /// Guesses the mode from the number of records: `Comment` for at most
    /// one, `Mass` otherwise.
    #[must_use]
    pub const fn guess(record_count: usize) -> Self {
        if record_count <= 1 {
            Self::Comment
        } else {
            Self::Mass
        }
    }

    /// Returns the storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Comment => "comment",
            Self::Mass => "mass",
        }
    }

    /// Returns `true` in mass mode.
    #[must_use]
    pub const fn is_mass(self) -> bool {
        matches!(self, Self::Mass)
    }
}

impl fmt::Display for CompositionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
