//! `PostgreSQL` adapter for moderation rule persistence.

mod models;
mod repository;
mod schema;

pub use repository::{ModerationPgPool, PostgresModerationRuleRepository};
