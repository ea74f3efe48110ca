use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use rust_decimal::Decimal;

use aggregator_core::errors::Result;
use aggregator_core::portfolio::lots::{
    HoldingLot, LotDisposal, LotRepositoryTrait, NewHoldingLot, NewLotDisposal,
};

use super::model::{HoldingLotDB, LotDisposalDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::holding_lots::dsl as lot_dsl;
use crate::schema::lot_disposals::dsl as disposal_dsl;

pub struct LotRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl LotRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl LotRepositoryTrait for LotRepository {
    async fn create_lot(&self, new_lot: NewHoldingLot) -> Result<HoldingLot> {
        self.writer
            .exec(move |conn| {
                let row = HoldingLotDB::new(uuid::Uuid::new_v4().to_string(), &new_lot);
                diesel::insert_into(lot_dsl::holding_lots)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(row.into())
            })
            .await
    }

    fn open_lots(&self, account_id_param: &str, security_id_param: &str) -> Result<Vec<HoldingLot>> {
        let mut conn = get_connection(&self.pool)?;
        lot_dsl::holding_lots
            .select(HoldingLotDB::as_select())
            .filter(lot_dsl::account_id.eq(account_id_param))
            .filter(lot_dsl::security_id.eq(security_id_param))
            .filter(lot_dsl::is_closed.eq(false))
            .order((lot_dsl::acquisition_date.asc(), lot_dsl::id.asc()))
            .load::<HoldingLotDB>(&mut conn)
            .map(|rows| rows.into_iter().map(HoldingLot::from).collect())
            .map_err(|e| StorageError::from(e).into())
    }

    fn open_quantity(&self, account_id_param: &str, security_id_param: &str) -> Result<Decimal> {
        let mut conn = get_connection(&self.pool)?;
        let quantities = lot_dsl::holding_lots
            .select(lot_dsl::current_quantity)
            .filter(lot_dsl::account_id.eq(account_id_param))
            .filter(lot_dsl::security_id.eq(security_id_param))
            .filter(lot_dsl::is_closed.eq(false))
            .load::<String>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(quantities
            .iter()
            .filter_map(|s| Decimal::from_str(s).ok())
            .sum())
    }

    async fn apply_disposal(&self, lot_id: &str, remaining_quantity: Decimal) -> Result<()> {
        let target = lot_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::update(lot_dsl::holding_lots.find(&target))
                    .set((
                        lot_dsl::current_quantity.eq(remaining_quantity.to_string()),
                        lot_dsl::is_closed.eq(remaining_quantity.is_zero()),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    async fn create_disposal(&self, new_disposal: NewLotDisposal) -> Result<LotDisposal> {
        self.writer
            .exec(move |conn| {
                let row = LotDisposalDB::new(uuid::Uuid::new_v4().to_string(), &new_disposal);
                diesel::insert_into(disposal_dsl::lot_disposals)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(row.into())
            })
            .await
    }

    fn list_lots_for_account(&self, account_id_param: &str) -> Result<Vec<HoldingLot>> {
        let mut conn = get_connection(&self.pool)?;
        lot_dsl::holding_lots
            .select(HoldingLotDB::as_select())
            .filter(lot_dsl::account_id.eq(account_id_param))
            .order((lot_dsl::acquisition_date.asc(), lot_dsl::id.asc()))
            .load::<HoldingLotDB>(&mut conn)
            .map(|rows| rows.into_iter().map(HoldingLot::from).collect())
            .map_err(|e| StorageError::from(e).into())
    }

    fn list_disposals_for_account(&self, account_id_param: &str) -> Result<Vec<LotDisposal>> {
        let mut conn = get_connection(&self.pool)?;
        disposal_dsl::lot_disposals
            .select(LotDisposalDB::as_select())
            .filter(disposal_dsl::account_id.eq(account_id_param))
            .order(disposal_dsl::disposal_date.asc())
            .load::<LotDisposalDB>(&mut conn)
            .map(|rows| rows.into_iter().map(LotDisposal::from).collect())
            .map_err(|e| StorageError::from(e).into())
    }
}
