//! Sync session domain model and the provider adapter contract.
//!
//! The adapter contract is a data-only SPI: no network or auth concerns
//! live here. Concrete providers (SnapTrade, SimpleFIN, IBKR Flex, ...)
//! are external collaborators that implement [`ProviderAdapter`].

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, SyncError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSession {
    pub id: String,
    pub timestamp: NaiveDateTime,
    pub is_complete: bool,
    pub error_message: Option<String>,
}

impl SyncSession {
    pub fn new(id: String) -> Self {
        Self {
            id,
            timestamp: Utc::now().naive_utc(),
            is_complete: false,
            error_message: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderLogStatus {
    Success,
    Partial,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncLogEntry {
    pub id: String,
    pub sync_session_id: String,
    pub provider_name: String,
    pub status: ProviderLogStatus,
    pub accounts_synced: u32,
    pub accounts_stale: u32,
    pub accounts_error: u32,
    pub error_message: Option<String>,
}

/// One account as reported by a provider adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderAccount {
    pub external_id: String,
    pub name: String,
    pub institution_name: String,
    pub account_number: Option<String>,
    pub account_type: Option<String>,
    pub currency: Option<String>,
}

/// One holding as reported by a provider adapter, not yet consolidated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderHolding {
    pub account_external_id: String,
    pub symbol: String,
    pub quantity: Decimal,
    pub price: Decimal,
    pub market_value: Decimal,
    pub currency: String,
    pub name: Option<String>,
    pub cost_basis: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderActivity {
    pub account_external_id: String,
    pub external_id: String,
    pub activity_date: NaiveDateTime,
    pub activity_type: String,
    pub amount: Decimal,
    pub ticker: Option<String>,
    pub units: Option<Decimal>,
    pub price: Option<Decimal>,
    pub currency: String,
    pub fee: Option<Decimal>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSyncError {
    pub message: String,
    pub category: String,
    pub institution_name: Option<String>,
    pub account_id: Option<String>,
    pub retriable: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSyncResult {
    pub accounts: Vec<ProviderAccount>,
    pub holdings: Vec<ProviderHolding>,
    pub activities: Vec<ProviderActivity>,
    pub errors: Vec<ProviderSyncError>,
    /// external_account_id -> reported balance timestamp
    pub balance_dates: std::collections::HashMap<String, NaiveDateTime>,
}

/// The interface every provider adapter satisfies (§4.1). Implementations
/// are expected to retry transient connection errors themselves (base ~1s
/// backoff, up to 3 attempts) before surfacing [`SyncError::ConnectionError`].
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Stable name used for `(provider_name, external_id)` uniqueness and
    /// for routing structured errors back to accounts.
    fn provider_name(&self) -> &str;

    async fn sync_all(&self) -> Result<ProviderSyncResult>;
}
