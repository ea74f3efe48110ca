use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;

use aggregator_core::errors::Result;
use aggregator_core::sync::{SyncLogEntry, SyncSession, SyncSessionRepositoryTrait};

use super::model::{SyncLogEntryDB, SyncSessionDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::sync_log_entries::dsl as log_dsl;
use crate::schema::sync_sessions::dsl as session_dsl;

pub struct SyncSessionRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SyncSessionRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl SyncSessionRepositoryTrait for SyncSessionRepository {
    async fn create(&self, session: SyncSession) -> Result<SyncSession> {
        self.writer
            .exec(move |conn| {
                let row: SyncSessionDB = session.into();
                diesel::insert_into(session_dsl::sync_sessions)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(row.into())
            })
            .await
    }

    async fn mark_complete(&self, session_id: &str, error: Option<String>) -> Result<()> {
        let target = session_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::update(session_dsl::sync_sessions.find(&target))
                    .set((
                        session_dsl::is_complete.eq(true),
                        session_dsl::error_message.eq(error),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    async fn create_log_entry(&self, entry: SyncLogEntry) -> Result<SyncLogEntry> {
        self.writer
            .exec(move |conn| {
                let row: SyncLogEntryDB = entry.into();
                diesel::insert_into(log_dsl::sync_log_entries)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(row.into())
            })
            .await
    }

    fn latest_complete_session(&self) -> Result<Option<SyncSession>> {
        let mut conn = get_connection(&self.pool)?;
        session_dsl::sync_sessions
            .select(SyncSessionDB::as_select())
            .filter(session_dsl::is_complete.eq(true))
            .order(session_dsl::timestamp.desc())
            .first::<SyncSessionDB>(&mut conn)
            .optional()
            .map(|opt| opt.map(SyncSession::from))
            .map_err(|e| StorageError::from(e).into())
    }
}
