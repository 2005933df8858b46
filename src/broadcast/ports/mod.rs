//! Port contracts for SMS broadcasts.
//!
//! The composer reaches the blacklist, the gateway, the per-record log and
//! the template registry only through these traits.

pub mod blacklist;
pub mod gateway;
pub mod log;
pub mod templates;

pub use blacklist::{BlacklistError, BlacklistResult, PhoneBlacklist};
pub use gateway::{DeliveryAck, GatewayError, GatewayResult, OutgoingSms, SmsGateway};
pub use log::{BroadcastLog, BroadcastLogError, BroadcastLogResult, LogEntry};
pub use templates::{TemplateRepository, TemplateRepositoryError, TemplateRepositoryResult};
