//! Database models for account snapshots and their holdings.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use rust_decimal::Decimal;

use aggregator_core::portfolio::snapshot::{
    AccountSnapshot, Holding, NewAccountSnapshot, NewHolding, SnapshotStatus,
};

fn status_str(status: SnapshotStatus) -> &'static str {
    match status {
        SnapshotStatus::Success => "success",
        SnapshotStatus::Failed => "failed",
    }
}

fn status_from_str(s: &str) -> SnapshotStatus {
    match s {
        "success" => SnapshotStatus::Success,
        _ => SnapshotStatus::Failed,
    }
}

#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::account_snapshots)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AccountSnapshotDB {
    pub id: String,
    pub account_id: String,
    pub sync_session_id: String,
    pub session_timestamp: NaiveDateTime,
    pub status: String,
    pub total_value: String,
    pub balance_date: Option<NaiveDate>,
}

impl From<AccountSnapshotDB> for AccountSnapshot {
    fn from(db: AccountSnapshotDB) -> Self {
        Self {
            id: db.id,
            account_id: db.account_id,
            sync_session_id: db.sync_session_id,
            session_timestamp: db.session_timestamp,
            status: status_from_str(&db.status),
            total_value: Decimal::from_str(&db.total_value).unwrap_or_default(),
            balance_date: db.balance_date,
        }
    }
}

impl AccountSnapshotDB {
    pub fn new(id: String, new_snapshot: &NewAccountSnapshot) -> Self {
        Self {
            id,
            account_id: new_snapshot.account_id.clone(),
            sync_session_id: new_snapshot.sync_session_id.clone(),
            session_timestamp: new_snapshot.session_timestamp,
            status: status_str(new_snapshot.status).to_string(),
            total_value: new_snapshot.total_value.to_string(),
            balance_date: new_snapshot.balance_date,
        }
    }
}

#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::holdings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct HoldingDB {
    pub id: String,
    pub account_snapshot_id: String,
    pub security_id: String,
    pub ticker: String,
    pub quantity: String,
    pub snapshot_price: String,
    pub snapshot_value: String,
    pub provider_cost_basis: Option<String>,
}

impl From<HoldingDB> for Holding {
    fn from(db: HoldingDB) -> Self {
        Self {
            id: db.id,
            account_snapshot_id: db.account_snapshot_id,
            security_id: db.security_id,
            ticker: db.ticker,
            quantity: Decimal::from_str(&db.quantity).unwrap_or_default(),
            snapshot_price: Decimal::from_str(&db.snapshot_price).unwrap_or_default(),
            snapshot_value: Decimal::from_str(&db.snapshot_value).unwrap_or_default(),
            provider_cost_basis: db
                .provider_cost_basis
                .as_deref()
                .and_then(|s| Decimal::from_str(s).ok()),
        }
    }
}

impl HoldingDB {
    pub fn new(id: String, account_snapshot_id: String, new_holding: &NewHolding) -> Self {
        Self {
            id,
            account_snapshot_id,
            security_id: new_holding.security_id.clone(),
            ticker: new_holding.ticker.clone(),
            quantity: new_holding.quantity.to_string(),
            snapshot_price: new_holding.snapshot_price.to_string(),
            snapshot_value: new_holding.snapshot_value.to_string(),
            provider_cost_basis: new_holding.provider_cost_basis.map(|d| d.to_string()),
        }
    }
}
