//! SQLite storage implementation for sync sessions and log entries.

mod model;
mod repository;

pub use model::{SyncLogEntryDB, SyncSessionDB};
pub use repository::SyncSessionRepository;
