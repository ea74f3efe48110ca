use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;

use aggregator_core::errors::Result;
use aggregator_core::portfolio::snapshot::{
    AccountSnapshot, Holding, NewAccountSnapshot, NewHolding, SnapshotRepositoryTrait,
};

use super::model::{AccountSnapshotDB, HoldingDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::account_snapshots::dsl as snapshot_dsl;
use crate::schema::holdings::dsl as holding_dsl;

pub struct SnapshotRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SnapshotRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl SnapshotRepositoryTrait for SnapshotRepository {
    async fn create_snapshot(
        &self,
        new_snapshot: NewAccountSnapshot,
        holdings: Vec<NewHolding>,
    ) -> Result<AccountSnapshot> {
        self.writer
            .exec(move |conn| {
                let snapshot_row =
                    AccountSnapshotDB::new(uuid::Uuid::new_v4().to_string(), &new_snapshot);
                diesel::insert_into(snapshot_dsl::account_snapshots)
                    .values(&snapshot_row)
                    .execute(conn)
                    .map_err(StorageError::from)?;

                let holding_rows: Vec<HoldingDB> = holdings
                    .iter()
                    .map(|h| {
                        HoldingDB::new(uuid::Uuid::new_v4().to_string(), snapshot_row.id.clone(), h)
                    })
                    .collect();
                if !holding_rows.is_empty() {
                    diesel::insert_into(holding_dsl::holdings)
                        .values(&holding_rows)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }

                Ok(snapshot_row.into())
            })
            .await
    }

    fn get_holdings(&self, account_snapshot_id: &str) -> Result<Vec<Holding>> {
        let mut conn = get_connection(&self.pool)?;
        holding_dsl::holdings
            .select(HoldingDB::as_select())
            .filter(holding_dsl::account_snapshot_id.eq(account_snapshot_id))
            .load::<HoldingDB>(&mut conn)
            .map(|rows| rows.into_iter().map(Holding::from).collect())
            .map_err(|e| StorageError::from(e).into())
    }

    fn latest_success_snapshot(&self, account_id: &str) -> Result<Option<AccountSnapshot>> {
        let mut conn = get_connection(&self.pool)?;
        snapshot_dsl::account_snapshots
            .select(AccountSnapshotDB::as_select())
            .filter(snapshot_dsl::account_id.eq(account_id))
            .filter(snapshot_dsl::status.eq("success"))
            .order(snapshot_dsl::session_timestamp.desc())
            .first::<AccountSnapshotDB>(&mut conn)
            .optional()
            .map(|opt| opt.map(AccountSnapshot::from))
            .map_err(|e| StorageError::from(e).into())
    }

    fn latest_success_snapshot_before(
        &self,
        account_id: &str,
        before: NaiveDateTime,
    ) -> Result<Option<AccountSnapshot>> {
        let mut conn = get_connection(&self.pool)?;
        snapshot_dsl::account_snapshots
            .select(AccountSnapshotDB::as_select())
            .filter(snapshot_dsl::account_id.eq(account_id))
            .filter(snapshot_dsl::status.eq("success"))
            .filter(snapshot_dsl::session_timestamp.le(before))
            .order(snapshot_dsl::session_timestamp.desc())
            .first::<AccountSnapshotDB>(&mut conn)
            .optional()
            .map(|opt| opt.map(AccountSnapshot::from))
            .map_err(|e| StorageError::from(e).into())
    }

    fn earliest_success_snapshot(&self, account_id: &str) -> Result<Option<AccountSnapshot>> {
        let mut conn = get_connection(&self.pool)?;
        snapshot_dsl::account_snapshots
            .select(AccountSnapshotDB::as_select())
            .filter(snapshot_dsl::account_id.eq(account_id))
            .filter(snapshot_dsl::status.eq("success"))
            .order(snapshot_dsl::session_timestamp.asc())
            .first::<AccountSnapshotDB>(&mut conn)
            .optional()
            .map(|opt| opt.map(AccountSnapshot::from))
            .map_err(|e| StorageError::from(e).into())
    }

    fn list_success_snapshots(&self, account_id: &str) -> Result<Vec<AccountSnapshot>> {
        let mut conn = get_connection(&self.pool)?;
        snapshot_dsl::account_snapshots
            .select(AccountSnapshotDB::as_select())
            .filter(snapshot_dsl::account_id.eq(account_id))
            .filter(snapshot_dsl::status.eq("success"))
            .order(snapshot_dsl::session_timestamp.asc())
            .load::<AccountSnapshotDB>(&mut conn)
            .map(|rows| rows.into_iter().map(AccountSnapshot::from).collect())
            .map_err(|e| StorageError::from(e).into())
    }
}
