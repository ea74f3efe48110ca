//! Snapshot and holding domain models (§3: `AccountSnapshot`, `Holding`).
//!
//! A snapshot is the immutable record of one account's state as observed
//! during one sync session. Its holdings never change after creation;
//! corrections happen by writing a new snapshot in a later session.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotStatus {
    Success,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSnapshot {
    pub id: String,
    pub account_id: String,
    pub sync_session_id: String,
    /// Denormalized from the owning sync session so the valuation and lot
    /// engines can order/window snapshots without an extra join.
    pub session_timestamp: NaiveDateTime,
    pub status: SnapshotStatus,
    pub total_value: Decimal,
    pub balance_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccountSnapshot {
    pub account_id: String,
    pub sync_session_id: String,
    pub session_timestamp: NaiveDateTime,
    pub status: SnapshotStatus,
    pub total_value: Decimal,
    pub balance_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub id: String,
    pub account_snapshot_id: String,
    pub security_id: String,
    pub ticker: String,
    pub quantity: Decimal,
    pub snapshot_price: Decimal,
    pub snapshot_value: Decimal,
    /// Cost basis as reported by the provider, when it reports one. The lot
    /// reconciliation engine prefers this over `snapshot_price` when seeding
    /// or growing a lot (§4.3).
    pub provider_cost_basis: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHolding {
    pub security_id: String,
    pub ticker: String,
    pub quantity: Decimal,
    pub snapshot_price: Decimal,
    pub snapshot_value: Decimal,
    pub provider_cost_basis: Option<Decimal>,
}
