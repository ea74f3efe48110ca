//! Database model for the daily holding value table.

use std::str::FromStr;

use chrono::NaiveDate;
use diesel::prelude::*;
use rust_decimal::Decimal;

use aggregator_core::portfolio::valuation::DailyHoldingValue;

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::daily_holding_values)]
#[diesel(primary_key(valuation_date, account_id, security_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DailyHoldingValueDB {
    pub valuation_date: NaiveDate,
    pub account_id: String,
    pub account_snapshot_id: String,
    pub security_id: String,
    pub ticker: String,
    pub quantity: String,
    pub close_price: String,
    pub market_value: String,
}

impl From<DailyHoldingValueDB> for DailyHoldingValue {
    fn from(db: DailyHoldingValueDB) -> Self {
        Self {
            valuation_date: db.valuation_date,
            account_id: db.account_id,
            account_snapshot_id: db.account_snapshot_id,
            security_id: db.security_id,
            ticker: db.ticker,
            quantity: Decimal::from_str(&db.quantity).unwrap_or_default(),
            close_price: Decimal::from_str(&db.close_price).unwrap_or_default(),
            market_value: Decimal::from_str(&db.market_value).unwrap_or_default(),
        }
    }
}

impl From<DailyHoldingValue> for DailyHoldingValueDB {
    fn from(domain: DailyHoldingValue) -> Self {
        Self {
            valuation_date: domain.valuation_date,
            account_id: domain.account_id,
            account_snapshot_id: domain.account_snapshot_id,
            security_id: domain.security_id,
            ticker: domain.ticker,
            quantity: domain.quantity.to_string(),
            close_price: domain.close_price.to_string(),
            market_value: domain.market_value.to_string(),
        }
    }
}
