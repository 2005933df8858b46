//! SMS broadcast context.
//!
//! Resolves the phone numbers of business records and typed numbers into
//! canonical destinations, cancels duplicates and blacklisted destinations
//! in mass mode, renders each body in the recipient's language and hands
//! the outgoing SMS to a gateway.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

pub use config::BroadcastConfig;
