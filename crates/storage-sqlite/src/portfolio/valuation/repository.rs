use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use rust_decimal::Decimal;

use aggregator_core::assets::ZERO_BALANCE_TICKER;
use aggregator_core::errors::Result;
use aggregator_core::portfolio::valuation::{DailyHoldingValue, ValuationRepositoryTrait};

use super::model::DailyHoldingValueDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::daily_holding_values::dsl::*;

pub struct ValuationRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ValuationRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl ValuationRepositoryTrait for ValuationRepository {
    fn max_valuation_date(&self, account_id_param: &str) -> Result<Option<NaiveDate>> {
        let mut conn = get_connection(&self.pool)?;
        daily_holding_values
            .select(valuation_date)
            .filter(account_id.eq(account_id_param))
            .order(valuation_date.desc())
            .first::<NaiveDate>(&mut conn)
            .optional()
            .map_err(|e| StorageError::from(e).into())
    }

    async fn upsert_many(&self, rows: Vec<DailyHoldingValue>, repair: bool) -> Result<()> {
        self.writer
            .exec(move |conn| {
                for row in rows {
                    let db_row: DailyHoldingValueDB = row.into();
                    if repair {
                        diesel::insert_into(daily_holding_values)
                            .values(&db_row)
                            .on_conflict((valuation_date, account_id, security_id))
                            .do_update()
                            .set(&db_row)
                            .execute(conn)
                            .map_err(StorageError::from)?;
                    } else {
                        diesel::insert_into(daily_holding_values)
                            .values(&db_row)
                            .on_conflict((valuation_date, account_id, security_id))
                            .do_update()
                            .set((
                                ticker.eq(db_row.ticker.clone()),
                                close_price.eq(db_row.close_price.clone()),
                                market_value.eq(db_row.market_value.clone()),
                            ))
                            .execute(conn)
                            .map_err(StorageError::from)?;
                    }
                }
                Ok(())
            })
            .await
    }

    async fn delete_real_rows(&self, account_id_param: &str, date_param: NaiveDate) -> Result<()> {
        let target_account = account_id_param.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(
                    daily_holding_values
                        .filter(account_id.eq(&target_account))
                        .filter(valuation_date.eq(date_param))
                        .filter(ticker.ne(ZERO_BALANCE_TICKER)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    async fn delete_sentinel(&self, account_id_param: &str, date_param: NaiveDate) -> Result<()> {
        let target_account = account_id_param.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(
                    daily_holding_values
                        .filter(account_id.eq(&target_account))
                        .filter(valuation_date.eq(date_param))
                        .filter(ticker.eq(ZERO_BALANCE_TICKER)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    fn rows_for_account_range(
        &self,
        account_id_param: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyHoldingValue>> {
        let mut conn = get_connection(&self.pool)?;
        daily_holding_values
            .select(DailyHoldingValueDB::as_select())
            .filter(account_id.eq(account_id_param))
            .filter(valuation_date.ge(from))
            .filter(valuation_date.le(to))
            .order(valuation_date.asc())
            .load::<DailyHoldingValueDB>(&mut conn)
            .map(|rows| rows.into_iter().map(DailyHoldingValue::from).collect())
            .map_err(|e| StorageError::from(e).into())
    }

    fn sum_market_value(&self, account_ids: &[String], date_param: NaiveDate) -> Result<Decimal> {
        let mut conn = get_connection(&self.pool)?;
        let rows = daily_holding_values
            .select(market_value)
            .filter(account_id.eq_any(account_ids))
            .filter(valuation_date.eq(date_param))
            .load::<String>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows
            .iter()
            .filter_map(|s| s.parse::<Decimal>().ok())
            .sum())
    }

    fn covered_dates(
        &self,
        account_id_param: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<NaiveDate>> {
        let mut conn = get_connection(&self.pool)?;
        daily_holding_values
            .select(valuation_date)
            .filter(account_id.eq(account_id_param))
            .filter(valuation_date.ge(from))
            .filter(valuation_date.le(to))
            .distinct()
            .order(valuation_date.asc())
            .load::<NaiveDate>(&mut conn)
            .map_err(|e| StorageError::from(e).into())
    }
}
