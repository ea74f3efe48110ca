use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;

use aggregator_core::assets::{
    AssetClass, AssetClassRepositoryTrait, NewAssetClass, NewSecurity, Security,
    SecurityRepositoryTrait, ZERO_BALANCE_NAME, ZERO_BALANCE_TICKER, CRYPTO_ASSET_CLASS_NAME,
};
use aggregator_core::errors::Result;

use super::model::{AssetClassDB, SecurityDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::asset_classes::dsl as asset_classes_dsl;
use crate::schema::securities::dsl as securities_dsl;

pub struct AssetRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl AssetRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl SecurityRepositoryTrait for AssetRepository {
    async fn create(&self, new_security: NewSecurity) -> Result<Security> {
        new_security.validate()?;
        self.writer
            .exec(move |conn| {
                let row: SecurityDB = new_security.into();
                diesel::insert_into(securities_dsl::securities)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(row.into())
            })
            .await
    }

    fn get_by_id(&self, security_id: &str) -> Result<Security> {
        let mut conn = get_connection(&self.pool)?;
        securities_dsl::securities
            .select(SecurityDB::as_select())
            .find(security_id)
            .first::<SecurityDB>(&mut conn)
            .map(Security::from)
            .map_err(|e| StorageError::from(e).into())
    }

    fn get_by_ticker(&self, ticker_param: &str) -> Result<Option<Security>> {
        let mut conn = get_connection(&self.pool)?;
        securities_dsl::securities
            .select(SecurityDB::as_select())
            .filter(securities_dsl::ticker.eq(ticker_param))
            .first::<SecurityDB>(&mut conn)
            .optional()
            .map(|opt| opt.map(Security::from))
            .map_err(|e| StorageError::from(e).into())
    }

    fn list(&self) -> Result<Vec<Security>> {
        let mut conn = get_connection(&self.pool)?;
        securities_dsl::securities
            .select(SecurityDB::as_select())
            .load::<SecurityDB>(&mut conn)
            .map(|rows| rows.into_iter().map(Security::from).collect())
            .map_err(|e| StorageError::from(e).into())
    }

    async fn get_or_create_zero_balance_security(&self) -> Result<Security> {
        if let Some(existing) = self.get_by_ticker(ZERO_BALANCE_TICKER)? {
            return Ok(existing);
        }
        self.writer
            .exec(move |conn| {
                let row: SecurityDB = NewSecurity {
                    id: None,
                    ticker: ZERO_BALANCE_TICKER.to_string(),
                    name: Some(ZERO_BALANCE_NAME.to_string()),
                    currency: "USD".to_string(),
                    manual_asset_class_id: None,
                }
                .into();
                diesel::insert_into(securities_dsl::securities)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(row.into())
            })
            .await
    }

    fn crypto_tickers(&self) -> Result<Option<Vec<String>>> {
        let mut conn = get_connection(&self.pool)?;
        let class = asset_classes_dsl::asset_classes
            .select(AssetClassDB::as_select())
            .filter(asset_classes_dsl::name.eq(CRYPTO_ASSET_CLASS_NAME))
            .first::<AssetClassDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        let Some(class) = class else {
            return Ok(None);
        };
        let tickers = securities_dsl::securities
            .select(securities_dsl::ticker)
            .filter(securities_dsl::manual_asset_class_id.eq(class.id))
            .load::<String>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(Some(tickers))
    }

    async fn set_asset_class(
        &self,
        security_id: &str,
        asset_class_id: Option<String>,
    ) -> Result<Security> {
        let target = security_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::update(securities_dsl::securities.find(&target))
                    .set((
                        securities_dsl::manual_asset_class_id.eq(&asset_class_id),
                        securities_dsl::updated_at.eq(chrono::Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(securities_dsl::securities
                    .select(SecurityDB::as_select())
                    .find(&target)
                    .first::<SecurityDB>(conn)
                    .map(Security::from)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}

#[async_trait]
impl AssetClassRepositoryTrait for AssetRepository {
    async fn create(&self, new_class: NewAssetClass) -> Result<AssetClass> {
        new_class.validate()?;
        self.writer
            .exec(move |conn| {
                let row: AssetClassDB = new_class.into();
                diesel::insert_into(asset_classes_dsl::asset_classes)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(row.into())
            })
            .await
    }

    async fn update(&self, class_id: &str, new_name: String) -> Result<AssetClass> {
        let target = class_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::update(asset_classes_dsl::asset_classes.find(&target))
                    .set(asset_classes_dsl::name.eq(&new_name))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(AssetClass {
                    id: target,
                    name: new_name,
                })
            })
            .await
    }

    async fn delete(&self, class_id: &str) -> Result<()> {
        let target = class_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(asset_classes_dsl::asset_classes.find(target))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    fn get_by_id(&self, class_id: &str) -> Result<AssetClass> {
        let mut conn = get_connection(&self.pool)?;
        asset_classes_dsl::asset_classes
            .select(AssetClassDB::as_select())
            .find(class_id)
            .first::<AssetClassDB>(&mut conn)
            .map(AssetClass::from)
            .map_err(|e| StorageError::from(e).into())
    }

    fn list(&self) -> Result<Vec<AssetClass>> {
        let mut conn = get_connection(&self.pool)?;
        asset_classes_dsl::asset_classes
            .select(AssetClassDB::as_select())
            .load::<AssetClassDB>(&mut conn)
            .map(|rows| rows.into_iter().map(AssetClass::from).collect())
            .map_err(|e| StorageError::from(e).into())
    }
}
