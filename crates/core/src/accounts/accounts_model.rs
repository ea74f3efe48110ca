//! Account domain model.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{errors::ValidationError, Error, Result};

/// Outcome of the most recent sync attempt for an account. `None` on the
/// `Account` field means the account has never been synced (or is manual).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Success,
    Stale,
    Failed,
    Skipped,
    Error,
    Syncing,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Success => "success",
            SyncStatus::Stale => "stale",
            SyncStatus::Failed => "failed",
            SyncStatus::Skipped => "skipped",
            SyncStatus::Error => "error",
            SyncStatus::Syncing => "syncing",
        }
    }
}

/// An investment account linked to a provider.
///
/// `provider_name` is `None` for locally-entered accounts; when set it must
/// match one of the adapters registered with the sync orchestrator, and
/// `(provider_name, external_id)` is unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    /// True once a user has renamed the account; sync then never overwrites `name`.
    pub name_user_edited: bool,
    pub account_type: String,
    pub currency: String,
    pub provider_name: Option<String>,
    pub external_id: Option<String>,
    pub institution_name: Option<String>,
    pub is_active: bool,
    pub deactivated_at: Option<NaiveDateTime>,
    pub superseded_by_account_id: Option<String>,
    /// Excluded from portfolio-scoped valuation/return aggregates when false.
    /// Account-scoped queries ignore this flag entirely.
    pub include_in_allocation: bool,
    pub assigned_asset_class_id: Option<String>,
    pub last_sync_time: Option<NaiveDateTime>,
    pub last_sync_status: Option<SyncStatus>,
    pub last_sync_error: Option<String>,
    pub balance_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Default for Account {
    fn default() -> Self {
        let now = chrono::Utc::now().naive_utc();
        Account {
            id: String::new(),
            name: String::new(),
            name_user_edited: false,
            account_type: String::new(),
            currency: String::new(),
            provider_name: None,
            external_id: None,
            institution_name: None,
            is_active: true,
            deactivated_at: None,
            superseded_by_account_id: None,
            include_in_allocation: true,
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

/// Input model for creating a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub account_type: String,
    pub currency: String,
    pub provider_name: Option<String>,
    pub external_id: Option<String>,
    pub institution_name: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default = "default_true")]
    pub include_in_allocation: bool,
}

fn default_true() -> bool {
    true
}

impl NewAccount {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Account name cannot be empty".to_string(),
            )));
        }
        if self.currency.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Currency cannot be empty".to_string(),
            )));
        }
        if self.provider_name.is_some() && self.external_id.is_none() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "external_id is required when provider_name is set".to_string(),
            )));
        }
        Ok(())
    }
}

/// Input model for updating an existing account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpdate {
    pub id: String,
    pub name: String,
    pub institution_name: Option<String>,
    pub is_active: Option<bool>,
    pub include_in_allocation: Option<bool>,
}

impl AccountUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Account name cannot be empty".to_string(),
            )));
        }
        Ok(())
    }
}

/// Input for `POST /api/accounts/{id}/deactivate` (§6): optionally writes a
/// $0 closing snapshot so the account's value history has no artificial gap.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeactivateAccountRequest {
    #[serde(default)]
    pub create_closing_snapshot: bool,
    pub superseded_by_account_id: Option<String>,
}
