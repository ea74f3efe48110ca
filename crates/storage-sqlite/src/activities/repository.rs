use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;

use aggregator_core::activities::{Activity, ActivityRepositoryTrait, NewActivity};
use aggregator_core::errors::Result;

use super::model::ActivityDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::activities::dsl::*;

pub struct ActivityRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ActivityRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl ActivityRepositoryTrait for ActivityRepository {
    async fn create(&self, new_activity: NewActivity) -> Result<Activity> {
        new_activity.validate()?;
        self.writer
            .exec(move |conn| {
                let row: ActivityDB = new_activity.into();
                diesel::insert_into(activities)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(row.into())
            })
            .await
    }

    async fn create_many(&self, new_activities: Vec<NewActivity>) -> Result<Vec<Activity>> {
        for a in &new_activities {
            a.validate()?;
        }
        self.writer
            .exec(move |conn| {
                let rows: Vec<ActivityDB> = new_activities.into_iter().map(Into::into).collect();
                diesel::insert_into(activities)
                    .values(&rows)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(rows.into_iter().map(Activity::from).collect())
            })
            .await
    }

    fn get_by_id(&self, activity_id: &str) -> Result<Activity> {
        let mut conn = get_connection(&self.pool)?;
        activities
            .select(ActivityDB::as_select())
            .find(activity_id)
            .first::<ActivityDB>(&mut conn)
            .map(Activity::from)
            .map_err(|e| StorageError::from(e).into())
    }

    fn delete(&self, activity_id: &str) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        diesel::delete(activities.find(activity_id))
            .execute(&mut conn)
            .map_err(StorageError::from)?;
        Ok(())
    }

    fn list_for_account(
        &self,
        account: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Activity>> {
        let mut conn = get_connection(&self.pool)?;
        activities
            .select(ActivityDB::as_select())
            .filter(account_id.eq(account))
            .filter(activity_date.ge(from))
            .filter(activity_date.le(to))
            .order(activity_date.asc())
            .load::<ActivityDB>(&mut conn)
            .map(|rows| rows.into_iter().map(Activity::from).collect())
            .map_err(|e| StorageError::from(e).into())
    }

    fn list_for_accounts(
        &self,
        account_ids_param: &[String],
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Activity>> {
        let mut conn = get_connection(&self.pool)?;
        activities
            .select(ActivityDB::as_select())
            .filter(account_id.eq_any(account_ids_param.to_vec()))
            .filter(activity_date.ge(from))
            .filter(activity_date.le(to))
            .order(activity_date.asc())
            .load::<ActivityDB>(&mut conn)
            .map(|rows| rows.into_iter().map(Activity::from).collect())
            .map_err(|e| StorageError::from(e).into())
    }

    fn list_trades_for_security(&self, account: &str, security: &str) -> Result<Vec<Activity>> {
        let mut conn = get_connection(&self.pool)?;
        activities
            .select(ActivityDB::as_select())
            .filter(account_id.eq(account))
            .filter(security_id.eq(security))
            .filter(activity_type.eq_any(["BUY", "SELL"]))
            .order(activity_date.asc())
            .load::<ActivityDB>(&mut conn)
            .map(|rows| rows.into_iter().map(Activity::from).collect())
            .map_err(|e| StorageError::from(e).into())
    }

    fn earliest_activity_date(&self, account: &str) -> Result<Option<NaiveDate>> {
        let mut conn = get_connection(&self.pool)?;
        activities
            .filter(account_id.eq(account))
            .select(activity_date)
            .order(activity_date.asc())
            .first::<NaiveDate>(&mut conn)
            .optional()
            .map_err(|e| StorageError::from(e).into())
    }
}
