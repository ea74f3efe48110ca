//! Repository contract for snapshots and holdings.

use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::snapshot_model::{AccountSnapshot, NewAccountSnapshot, NewHolding};
use crate::errors::Result;

#[async_trait]
pub trait SnapshotRepositoryTrait: Send + Sync {
    /// Creates a snapshot and its holdings atomically (one nested savepoint
    /// in the storage layer, per §5's per-account write path).
    async fn create_snapshot(
        &self,
        new_snapshot: NewAccountSnapshot,
        holdings: Vec<NewHolding>,
    ) -> Result<AccountSnapshot>;

    fn get_holdings(
        &self,
        account_snapshot_id: &str,
    ) -> Result<Vec<super::snapshot_model::Holding>>;

    /// Most recent `status=success` snapshot, if any.
    fn latest_success_snapshot(&self, account_id: &str) -> Result<Option<AccountSnapshot>>;

    /// Most recent `status=success` snapshot with `session_timestamp <= before`.
    fn latest_success_snapshot_before(
        &self,
        account_id: &str,
        before: NaiveDateTime,
    ) -> Result<Option<AccountSnapshot>>;

    /// Earliest `status=success` snapshot, used for `FullBackfill` and for
    /// lot reconciliation's first-sync detection.
    fn earliest_success_snapshot(&self, account_id: &str) -> Result<Option<AccountSnapshot>>;

    /// All `status=success` snapshots ordered by `session_timestamp` ascending.
    fn list_success_snapshots(&self, account_id: &str) -> Result<Vec<AccountSnapshot>>;
}
