//! Channel moderation for mailing-list channels.
//!
//! Messages posted on a moderated channel pass a gate that accepts them,
//! holds them for a moderator or discards them, depending on who wrote them
//! and on the channel's per-address allow/ban rules. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

pub use config::ModerationConfig;
