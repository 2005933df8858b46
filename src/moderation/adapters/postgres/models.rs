//! Diesel row models for moderation rule persistence.

use super::schema::moderation_rules;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for moderation rules.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = moderation_rules)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ModerationRuleRow {
    /// Internal rule identifier.
    pub id: uuid::Uuid,
    /// Channel the rule applies to.
    pub channel_id: uuid::Uuid,
    /// Normalised email address.
    pub email: String,
    /// Rule status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for moderation rules.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = moderation_rules)]
pub struct NewModerationRuleRow {
    /// Internal rule identifier.
    pub id: uuid::Uuid,
    /// Channel the rule applies to.
    pub channel_id: uuid::Uuid,
    /// Normalised email address.
    pub email: String,
    /// Rule status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
