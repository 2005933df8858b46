//! Adapter implementations of the broadcast ports.

pub mod memory;
