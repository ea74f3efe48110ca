//! Repository and service contracts for activities.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::activities_model::{Activity, NewActivity};
use crate::errors::Result;

#[async_trait]
pub trait ActivityRepositoryTrait: Send + Sync {
    async fn create(&self, new_activity: NewActivity) -> Result<Activity>;
    /// Bulk insert used by the sync orchestrator when committing a batch of
    /// activities discovered during a single provider sync.
    async fn create_many(&self, new_activities: Vec<NewActivity>) -> Result<Vec<Activity>>;
    fn get_by_id(&self, activity_id: &str) -> Result<Activity>;
    fn delete(&self, activity_id: &str) -> Result<()>;
    /// All activities for an account within `[from, to]` inclusive, ordered
    /// by `activity_date` ascending — the ordering both the lot reconciliation
    /// engine and the returns engine rely on.
    fn list_for_account(
        &self,
        account_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Activity>>;
    /// Same as [`Self::list_for_account`] but scoped to several accounts at
    /// once, used by portfolio-level returns queries.
    fn list_for_accounts(
        &self,
        account_ids: &[String],
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Activity>>;
    /// Buy/sell activities for one account+security pair, ascending by date
    /// — the exact stream the lot reconciliation engine FIFO-matches against.
    fn list_trades_for_security(
        &self,
        account_id: &str,
        security_id: &str,
    ) -> Result<Vec<Activity>>;
    fn earliest_activity_date(&self, account_id: &str) -> Result<Option<NaiveDate>>;
}

#[async_trait]
pub trait ActivityServiceTrait: Send + Sync {
    async fn create_activity(&self, new_activity: NewActivity) -> Result<Activity>;
    async fn create_activities(&self, new_activities: Vec<NewActivity>) -> Result<Vec<Activity>>;
    fn get_activity(&self, activity_id: &str) -> Result<Activity>;
    fn delete_activity(&self, activity_id: &str) -> Result<()>;
    fn list_for_account(
        &self,
        account_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Activity>>;
}
