//! Persistence contracts for sync sessions and log entries.

use async_trait::async_trait;

use super::sync_model::{SyncLogEntry, SyncSession};
use crate::errors::Result;

#[async_trait]
pub trait SyncSessionRepositoryTrait: Send + Sync {
    async fn create(&self, session: SyncSession) -> Result<SyncSession>;
    async fn mark_complete(&self, id: &str, error_message: Option<String>) -> Result<()>;
    async fn create_log_entry(&self, entry: SyncLogEntry) -> Result<SyncLogEntry>;
    /// The most recent session where `is_complete = true`, used by the
    /// valuation engine's `FullBackfill` to find the earliest successful sync.
    fn latest_complete_session(&self) -> Result<Option<SyncSession>>;
}
