//! Database models for tax lots and their disposals.

use std::str::FromStr;

use chrono::NaiveDate;
use diesel::prelude::*;
use rust_decimal::Decimal;

use aggregator_core::portfolio::lots::{
    DisposalSource, HoldingLot, LotDisposal, LotSource, NewHoldingLot, NewLotDisposal,
};

fn lot_source_str(source: LotSource) -> &'static str {
    match source {
        LotSource::Initial => "initial",
        LotSource::Inferred => "inferred",
        LotSource::Activity => "activity",
        LotSource::Manual => "manual",
    }
}

fn lot_source_from_str(s: &str) -> LotSource {
    match s {
        "initial" => LotSource::Initial,
        "activity" => LotSource::Activity,
        "manual" => LotSource::Manual,
        _ => LotSource::Inferred,
    }
}

fn disposal_source_str(source: DisposalSource) -> &'static str {
    match source {
        DisposalSource::Inferred => "inferred",
        DisposalSource::Activity => "activity",
    }
}

fn disposal_source_from_str(s: &str) -> DisposalSource {
    match s {
        "activity" => DisposalSource::Activity,
        _ => DisposalSource::Inferred,
    }
}

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::holding_lots)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct HoldingLotDB {
    pub id: String,
    pub account_id: String,
    pub security_id: String,
    pub ticker: String,
    pub acquisition_date: Option<NaiveDate>,
    pub cost_basis_per_unit: String,
    pub original_quantity: String,
    pub current_quantity: String,
    pub is_closed: bool,
    pub source: String,
    pub activity_id: Option<String>,
}

impl From<HoldingLotDB> for HoldingLot {
    fn from(db: HoldingLotDB) -> Self {
        Self {
            id: db.id,
            account_id: db.account_id,
            security_id: db.security_id,
            ticker: db.ticker,
            acquisition_date: db.acquisition_date,
            cost_basis_per_unit: Decimal::from_str(&db.cost_basis_per_unit).unwrap_or_default(),
            original_quantity: Decimal::from_str(&db.original_quantity).unwrap_or_default(),
            current_quantity: Decimal::from_str(&db.current_quantity).unwrap_or_default(),
            is_closed: db.is_closed,
            source: lot_source_from_str(&db.source),
            activity_id: db.activity_id,
        }
    }
}

impl HoldingLotDB {
    pub fn new(id: String, new_lot: &NewHoldingLot) -> Self {
        let is_closed = new_lot.current_quantity.is_zero();
        Self {
            id,
            account_id: new_lot.account_id.clone(),
            security_id: new_lot.security_id.clone(),
            ticker: new_lot.ticker.clone(),
            acquisition_date: new_lot.acquisition_date,
            cost_basis_per_unit: new_lot.cost_basis_per_unit.to_string(),
            original_quantity: new_lot.original_quantity.to_string(),
            current_quantity: new_lot.current_quantity.to_string(),
            is_closed,
            source: lot_source_str(new_lot.source).to_string(),
            activity_id: new_lot.activity_id.clone(),
        }
    }
}

#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::lot_disposals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LotDisposalDB {
    pub id: String,
    pub holding_lot_id: String,
    pub account_id: String,
    pub security_id: String,
    pub quantity: String,
    pub proceeds_per_unit: String,
    pub disposal_date: NaiveDate,
    pub source: String,
    pub activity_id: Option<String>,
    pub disposal_group_id: String,
}

impl From<LotDisposalDB> for LotDisposal {
    fn from(db: LotDisposalDB) -> Self {
        Self {
            id: db.id,
            holding_lot_id: db.holding_lot_id,
            account_id: db.account_id,
            security_id: db.security_id,
            quantity: Decimal::from_str(&db.quantity).unwrap_or_default(),
            proceeds_per_unit: Decimal::from_str(&db.proceeds_per_unit).unwrap_or_default(),
            disposal_date: db.disposal_date,
            source: disposal_source_from_str(&db.source),
            activity_id: db.activity_id,
            disposal_group_id: db.disposal_group_id,
        }
    }
}

impl LotDisposalDB {
    pub fn new(id: String, new_disposal: &NewLotDisposal) -> Self {
        Self {
            id,
            holding_lot_id: new_disposal.holding_lot_id.clone(),
            account_id: new_disposal.account_id.clone(),
            security_id: new_disposal.security_id.clone(),
            quantity: new_disposal.quantity.to_string(),
            proceeds_per_unit: new_disposal.proceeds_per_unit.to_string(),
            disposal_date: new_disposal.disposal_date,
            source: disposal_source_str(new_disposal.source).to_string(),
            activity_id: new_disposal.activity_id.clone(),
            disposal_group_id: new_disposal.disposal_group_id.clone(),
        }
    }
}
