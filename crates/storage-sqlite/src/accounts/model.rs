//! Database model for accounts.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use aggregator_core::accounts::{Account, AccountUpdate, NewAccount, SyncStatus};

fn sync_status_to_str(status: SyncStatus) -> &'static str {
    status.as_str()
}

fn sync_status_from_str(s: &str) -> Option<SyncStatus> {
    match s {
        "success" => Some(SyncStatus::Success),
        "stale" => Some(SyncStatus::Stale),
        "failed" => Some(SyncStatus::Failed),
        "skipped" => Some(SyncStatus::Skipped),
        "error" => Some(SyncStatus::Error),
        "syncing" => Some(SyncStatus::Syncing),
        _ => None,
    }
}

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AccountDB {
    pub id: String,
    pub name: String,
    pub name_user_edited: bool,
    pub account_type: String,
    pub currency: String,
    pub provider_name: Option<String>,
    pub external_id: Option<String>,
    pub institution_name: Option<String>,
    pub is_active: bool,
    pub deactivated_at: Option<NaiveDateTime>,
    pub superseded_by_account_id: Option<String>,
    pub include_in_allocation: bool,
    pub assigned_asset_class_id: Option<String>,
    pub last_sync_time: Option<NaiveDateTime>,
    pub last_sync_status: Option<String>,
    pub last_sync_error: Option<String>,
    pub balance_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<AccountDB> for Account {
    fn from(db: AccountDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            name_user_edited: db.name_user_edited,
            account_type: db.account_type,
            currency: db.currency,
            provider_name: db.provider_name,
            external_id: db.external_id,
            institution_name: db.institution_name,
            is_active: db.is_active,
            deactivated_at: db.deactivated_at,
            superseded_by_account_id: db.superseded_by_account_id,
            include_in_allocation: db.include_in_allocation,
            assigned_asset_class_id: db.assigned_asset_class_id,
            last_sync_time: db.last_sync_time,
            last_sync_status: db.last_sync_status.as_deref().and_then(sync_status_from_str),
            last_sync_error: db.last_sync_error,
            balance_date: db.balance_date,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewAccount> for AccountDB {
    fn from(domain: NewAccount) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: domain.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name: domain.name,
            name_user_edited: false,
            account_type: domain.account_type,
            currency: domain.currency,
            provider_name: domain.provider_name,
            external_id: domain.external_id,
            institution_name: domain.institution_name,
            is_active: domain.is_active,
            deactivated_at: None,
            superseded_by_account_id: None,
            include_in_allocation: domain.include_in_allocation,
            assigned_asset_class_id: None,
            last_sync_time: None,
            last_sync_status: None,
            last_sync_error: None,
            balance_date: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Applies [`AccountUpdate`]'s user-editable fields onto an existing row,
/// preserving everything sync status and provider linkage own.
pub fn apply_account_update(existing: &mut AccountDB, update: AccountUpdate) {
    existing.name = update.name;
    existing.name_user_edited = true;
    existing.institution_name = update.institution_name;
    if let Some(active) = update.is_active {
        existing.is_active = active;
    }
    if let Some(include) = update.include_in_allocation {
        existing.include_in_allocation = include;
    }
    existing.updated_at = chrono::Utc::now().naive_utc();
}

pub fn sync_status_str(status: SyncStatus) -> &'static str {
    sync_status_to_str(status)
}
