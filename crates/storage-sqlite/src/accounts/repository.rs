use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use aggregator_core::accounts::{
    Account, AccountRepositoryTrait, AccountUpdate, NewAccount, SyncStatus,
};
use aggregator_core::errors::Result;

use super::model::{apply_account_update, sync_status_str, AccountDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::accounts::dsl::*;

pub struct AccountRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl AccountRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl AccountRepositoryTrait for AccountRepository {
    async fn create(&self, new_account: NewAccount) -> Result<Account> {
        new_account.validate()?;
        self.writer
            .exec(move |conn| {
                let account_db: AccountDB = new_account.into();
                diesel::insert_into(accounts)
                    .values(&account_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(account_db.into())
            })
            .await
    }

    async fn update(&self, account_update: AccountUpdate) -> Result<Account> {
        account_update.validate()?;
        self.writer
            .exec(move |conn| {
                let mut existing = accounts
                    .select(AccountDB::as_select())
                    .find(&account_update.id)
                    .first::<AccountDB>(conn)
                    .map_err(StorageError::from)?;
                apply_account_update(&mut existing, account_update);
                diesel::update(accounts.find(&existing.id))
                    .set(&existing)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(existing.into())
            })
            .await
    }

    async fn delete(&self, account_id: &str) -> Result<usize> {
        let target = account_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(accounts.find(target))
                    .execute(conn)
                    .map_err(|e| StorageError::from(e).into())
            })
            .await
    }

    fn get_by_id(&self, account_id: &str) -> Result<Account> {
        let mut conn = get_connection(&self.pool)?;
        accounts
            .select(AccountDB::as_select())
            .find(account_id)
            .first::<AccountDB>(&mut conn)
            .map(Account::from)
            .map_err(|e| StorageError::from(e).into())
    }

    fn find_by_provider_external_id(
        &self,
        provider: &str,
        external: &str,
    ) -> Result<Option<Account>> {
        let mut conn = get_connection(&self.pool)?;
        accounts
            .select(AccountDB::as_select())
            .filter(provider_name.eq(provider))
            .filter(external_id.eq(external))
            .first::<AccountDB>(&mut conn)
            .optional()
            .map(|opt| opt.map(Account::from))
            .map_err(|e| StorageError::from(e).into())
    }

    fn list(
        &self,
        is_active_filter: Option<bool>,
        account_ids: Option<&[String]>,
    ) -> Result<Vec<Account>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = accounts.into_boxed();
        if let Some(active) = is_active_filter {
            query = query.filter(is_active.eq(active));
        }
        if let Some(ids) = account_ids {
            query = query.filter(id.eq_any(ids.to_vec()));
        }
        query
            .select(AccountDB::as_select())
            .order((is_active.desc(), name.asc()))
            .load::<AccountDB>(&mut conn)
            .map(|rows| rows.into_iter().map(Account::from).collect())
            .map_err(|e| StorageError::from(e).into())
    }

    fn list_active_by_provider(&self, provider: &str) -> Result<Vec<Account>> {
        let mut conn = get_connection(&self.pool)?;
        accounts
            .select(AccountDB::as_select())
            .filter(provider_name.eq(provider))
            .filter(is_active.eq(true))
            .load::<AccountDB>(&mut conn)
            .map(|rows| rows.into_iter().map(Account::from).collect())
            .map_err(|e| StorageError::from(e).into())
    }

    async fn upsert_from_provider(
        &self,
        account_id: &str,
        new_name: Option<String>,
        new_institution_name: String,
    ) -> Result<Account> {
        let target = account_id.to_string();
        self.writer
            .exec(move |conn| {
                let now = chrono::Utc::now().naive_utc();
                diesel::update(accounts.find(&target))
                    .set((
                        institution_name.eq(Some(new_institution_name)),
                        is_active.eq(true),
                        updated_at.eq(now),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if let Some(renamed) = new_name {
                    diesel::update(accounts.find(&target))
                        .set(name.eq(renamed))
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                accounts
                    .select(AccountDB::as_select())
                    .find(&target)
                    .first::<AccountDB>(conn)
                    .map(Account::from)
                    .map_err(|e| StorageError::from(e).into())
            })
            .await
    }

    async fn update_sync_status(
        &self,
        account_id: &str,
        status: SyncStatus,
        error: Option<String>,
        last_sync: Option<NaiveDateTime>,
        balance: Option<NaiveDate>,
    ) -> Result<()> {
        let target = account_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::update(accounts.find(&target))
                    .set((
                        last_sync_status.eq(Some(sync_status_str(status).to_string())),
                        last_sync_error.eq(error),
                        last_sync_time.eq(last_sync),
                        balance_date.eq(balance),
                        updated_at.eq(chrono::Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    async fn deactivate(
        &self,
        account_id: &str,
        superseded_by: Option<String>,
    ) -> Result<Account> {
        let target = account_id.to_string();
        self.writer
            .exec(move |conn| {
                let now = chrono::Utc::now().naive_utc();
                diesel::update(accounts.find(&target))
                    .set((
                        is_active.eq(false),
                        deactivated_at.eq(Some(now)),
                        superseded_by_account_id.eq(superseded_by),
                        updated_at.eq(now),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                accounts
                    .select(AccountDB::as_select())
                    .find(&target)
                    .first::<AccountDB>(conn)
                    .map(Account::from)
                    .map_err(|e| StorageError::from(e).into())
            })
            .await
    }
}
