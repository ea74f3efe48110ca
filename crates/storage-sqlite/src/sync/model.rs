//! Database models for sync sessions and per-provider log entries.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use aggregator_core::sync::{ProviderLogStatus, SyncLogEntry, SyncSession};

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::sync_sessions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SyncSessionDB {
    pub id: String,
    pub timestamp: NaiveDateTime,
    pub is_complete: bool,
    pub error_message: Option<String>,
}

impl From<SyncSessionDB> for SyncSession {
    fn from(db: SyncSessionDB) -> Self {
        Self {
            id: db.id,
            timestamp: db.timestamp,
            is_complete: db.is_complete,
            error_message: db.error_message,
        }
    }
}

impl From<SyncSession> for SyncSessionDB {
    fn from(domain: SyncSession) -> Self {
        Self {
            id: domain.id,
            timestamp: domain.timestamp,
            is_complete: domain.is_complete,
            error_message: domain.error_message,
        }
    }
}

fn log_status_str(status: ProviderLogStatus) -> &'static str {
    match status {
        ProviderLogStatus::Success => "success",
        ProviderLogStatus::Partial => "partial",
        ProviderLogStatus::Failed => "failed",
    }
}

fn log_status_from_str(s: &str) -> ProviderLogStatus {
    match s {
        "success" => ProviderLogStatus::Success,
        "partial" => ProviderLogStatus::Partial,
        _ => ProviderLogStatus::Failed,
    }
}

#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::sync_log_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SyncLogEntryDB {
    pub id: String,
    pub sync_session_id: String,
    pub provider_name: String,
    pub status: String,
    pub accounts_synced: i32,
    pub accounts_stale: i32,
    pub accounts_error: i32,
    pub error_message: Option<String>,
}

impl From<SyncLogEntryDB> for SyncLogEntry {
    fn from(db: SyncLogEntryDB) -> Self {
        Self {
            id: db.id,
            sync_session_id: db.sync_session_id,
            provider_name: db.provider_name,
            status: log_status_from_str(&db.status),
            accounts_synced: db.accounts_synced as u32,
            accounts_stale: db.accounts_stale as u32,
            accounts_error: db.accounts_error as u32,
            error_message: db.error_message,
        }
    }
}

impl From<SyncLogEntry> for SyncLogEntryDB {
    fn from(domain: SyncLogEntry) -> Self {
        Self {
            id: domain.id,
            sync_session_id: domain.sync_session_id,
            provider_name: domain.provider_name,
            status: log_status_str(domain.status).to_string(),
            accounts_synced: domain.accounts_synced as i32,
            accounts_stale: domain.accounts_stale as i32,
            accounts_error: domain.accounts_error as i32,
            error_message: domain.error_message,
        }
    }
}
