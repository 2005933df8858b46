//! Courier: channel moderation and SMS broadcast composition.
//!
//! This crate provides two independent messaging features: a moderation gate
//! that decides whether a message posted to a channel is accepted, held for
//! review or silently dropped, and a composer that resolves broadcast
//! recipients to canonical phone numbers before handing SMS to a gateway.
//!
//! # Architecture
//!
//! Courier follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`moderation`]: Channel moderation rules, review and mailing-list fan-out
//! - [`broadcast`]: SMS recipient resolution, deduplication and blacklists

pub mod broadcast;
pub mod moderation;
