use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use serde_json::Value;

use aggregator_core::errors::Result;
use aggregator_core::settings::{Preference, PreferenceRepositoryTrait};

use super::model::PreferenceDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::preferences::dsl::*;

pub struct PreferenceRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl PreferenceRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl PreferenceRepositoryTrait for PreferenceRepository {
    fn get(&self, key_param: &str) -> Result<Option<Preference>> {
        let mut conn = get_connection(&self.pool)?;
        preferences
            .select(PreferenceDB::as_select())
            .find(key_param)
            .first::<PreferenceDB>(&mut conn)
            .optional()
            .map(|opt| opt.map(Preference::from))
            .map_err(|e| StorageError::from(e).into())
    }

    fn list(&self) -> Result<Vec<Preference>> {
        let mut conn = get_connection(&self.pool)?;
        preferences
            .select(PreferenceDB::as_select())
            .load::<PreferenceDB>(&mut conn)
            .map(|rows| rows.into_iter().map(Preference::from).collect())
            .map_err(|e| StorageError::from(e).into())
    }

    async fn set(&self, key_param: &str, value_param: Value) -> Result<Preference> {
        let target = key_param.to_string();
        self.writer
            .exec(move |conn| {
                let row = PreferenceDB {
                    key: target,
                    value: value_param.to_string(),
                    updated_at: chrono::Utc::now().naive_utc(),
                };
                diesel::replace_into(preferences)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(row.into())
            })
            .await
    }

    async fn delete(&self, key_param: &str) -> Result<()> {
        let target = key_param.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(preferences.find(target))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }
}
