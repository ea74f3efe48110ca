//! Account repository and service traits.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use super::accounts_model::{Account, AccountUpdate, NewAccount, SyncStatus};
use crate::errors::Result;

/// Persistence contract for accounts. Database-agnostic.
#[async_trait]
pub trait AccountRepositoryTrait: Send + Sync {
    async fn create(&self, new_account: NewAccount) -> Result<Account>;
    async fn update(&self, account_update: AccountUpdate) -> Result<Account>;
    async fn delete(&self, account_id: &str) -> Result<usize>;
    fn get_by_id(&self, account_id: &str) -> Result<Account>;
    fn find_by_provider_external_id(
        &self,
        provider_name: &str,
        external_id: &str,
    ) -> Result<Option<Account>>;

    /// Lists accounts with optional filters.
    fn list(
        &self,
        is_active_filter: Option<bool>,
        account_ids: Option<&[String]>,
    ) -> Result<Vec<Account>>;

    /// Lists every active account belonging to `provider_name`, used by the
    /// sync orchestrator to mark accounts `failed`/`skipped`/`error`.
    fn list_active_by_provider(&self, provider_name: &str) -> Result<Vec<Account>>;

    /// Applies provider-observed fields during a sync (§4.1 step c):
    /// `institution_name` is always refreshed, `name` only when `Some`
    /// (the orchestrator passes `None` when `name_user_edited` is set), and
    /// the account is reactivated. Unlike [`Self::update`], this never sets
    /// `name_user_edited` — that flag is owned by the user-facing rename
    /// path only.
    async fn upsert_from_provider(
        &self,
        account_id: &str,
        name: Option<String>,
        institution_name: String,
    ) -> Result<Account>;

    /// Applies a sync-path status transition without touching user-editable
    /// fields (`name` when `name_user_edited`, `include_in_allocation`, ...).
    async fn update_sync_status(
        &self,
        account_id: &str,
        status: SyncStatus,
        error: Option<String>,
        last_sync_time: Option<NaiveDateTime>,
        balance_date: Option<NaiveDate>,
    ) -> Result<()>;

    async fn deactivate(
        &self,
        account_id: &str,
        superseded_by_account_id: Option<String>,
    ) -> Result<Account>;
}

/// Business-logic layer over [`AccountRepositoryTrait`].
#[async_trait]
pub trait AccountServiceTrait: Send + Sync {
    async fn create_account(&self, new_account: NewAccount) -> Result<Account>;
    async fn update_account(&self, account_update: AccountUpdate) -> Result<Account>;
    async fn delete_account(&self, account_id: &str) -> Result<()>;
    fn get_account(&self, account_id: &str) -> Result<Account>;
    fn list_accounts(
        &self,
        is_active_filter: Option<bool>,
        account_ids: Option<&[String]>,
    ) -> Result<Vec<Account>>;
    fn get_all_accounts(&self) -> Result<Vec<Account>>;
    fn get_active_accounts(&self) -> Result<Vec<Account>>;
    fn get_accounts_by_ids(&self, account_ids: &[String]) -> Result<Vec<Account>>;
    async fn deactivate_account(
        &self,
        account_id: &str,
        superseded_by_account_id: Option<String>,
    ) -> Result<Account>;
}
