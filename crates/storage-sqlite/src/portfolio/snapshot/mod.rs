//! SQLite storage implementation for account snapshots and holdings.

mod model;
mod repository;

pub use model::{AccountSnapshotDB, HoldingDB};
pub use repository::SnapshotRepository;
