//! Thin service layer over the activity repository. Sync writes land here
//! through [`crate::sync`]'s orchestrator, not through this service — this
//! is the user/API-facing CRUD surface only.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use super::activities_model::{Activity, NewActivity};
use super::activities_traits::{ActivityRepositoryTrait, ActivityServiceTrait};
use crate::errors::Result;

pub struct ActivityService {
    repository: Arc<dyn ActivityRepositoryTrait>,
}

impl ActivityService {
    pub fn new(repository: Arc<dyn ActivityRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl ActivityServiceTrait for ActivityService {
    async fn create_activity(&self, new_activity: NewActivity) -> Result<Activity> {
        new_activity.validate()?;
        self.repository.create(new_activity).await
    }

    async fn create_activities(&self, new_activities: Vec<NewActivity>) -> Result<Vec<Activity>> {
        for activity in &new_activities {
            activity.validate()?;
        }
        self.repository.create_many(new_activities).await
    }

    fn get_activity(&self, activity_id: &str) -> Result<Activity> {
        self.repository.get_by_id(activity_id)
    }

    fn delete_activity(&self, activity_id: &str) -> Result<()> {
        self.repository.delete(activity_id)
    }

    fn list_for_account(
        &self,
        account_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Activity>> {
        self.repository.list_for_account(account_id, from, to)
    }
}
