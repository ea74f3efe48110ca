//! Persistence for the provider enable/disable registry.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;

use aggregator_core::accounts::{ProviderRegistration, ProviderRegistryTrait};
use aggregator_core::errors::Result;

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::provider_registrations::dsl::*;

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::provider_registrations)]
#[diesel(primary_key(name))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct ProviderRegistrationDB {
    name: String,
    is_enabled: bool,
}

impl From<ProviderRegistrationDB> for ProviderRegistration {
    fn from(db: ProviderRegistrationDB) -> Self {
        Self {
            name: db.name,
            is_enabled: db.is_enabled,
        }
    }
}

pub struct ProviderRegistryRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ProviderRegistryRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl ProviderRegistryTrait for ProviderRegistryRepository {
    fn list(&self) -> Result<Vec<ProviderRegistration>> {
        let mut conn = get_connection(&self.pool)?;
        provider_registrations
            .load::<ProviderRegistrationDB>(&mut conn)
            .map(|rows| rows.into_iter().map(ProviderRegistration::from).collect())
            .map_err(|e| StorageError::from(e).into())
    }

    async fn set_enabled(&self, provider: &str, enabled: bool) -> Result<ProviderRegistration> {
        let target = provider.to_string();
        self.writer
            .exec(move |conn| {
                let row = ProviderRegistrationDB {
                    name: target.clone(),
                    is_enabled: enabled,
                };
                diesel::replace_into(provider_registrations)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(row.into())
            })
            .await
    }
}
