//! In-memory adapters for broadcast ports, used by tests and demos.

mod blacklist;
mod gateway;
mod log;
mod templates;

pub use blacklist::InMemoryPhoneBlacklist;
pub use gateway::RecordingSmsGateway;
pub use log::InMemoryBroadcastLog;
pub use templates::InMemoryTemplateRepository;

fn poisoned(err: impl ToString) -> std::io::Error {
    std::io::Error::other(err.to_string())
}
