//! Adapter implementations for moderation ports.

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;
