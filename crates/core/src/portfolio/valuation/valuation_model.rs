//! Daily holding value domain model (§3: `DailyHoldingValue`) and the
//! result/report types the valuation engine's three operations return.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyHoldingValue {
    pub valuation_date: NaiveDate,
    pub account_id: String,
    pub account_snapshot_id: String,
    pub security_id: String,
    pub ticker: String,
    pub quantity: Decimal,
    pub close_price: Decimal,
    pub market_value: Decimal,
}

pub type NewDailyHoldingValue = DailyHoldingValue;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationResult {
    pub dates_calculated: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapReport {
    pub account_id: String,
    pub expected_start: NaiveDate,
    pub expected_end: NaiveDate,
    pub missing_dates: Vec<NaiveDate>,
    /// Dates where a row exists but coverage looks inconsistent (e.g. a
    /// sentinel alongside real rows) — surfaced for operator attention.
    pub partial_dates: Vec<NaiveDate>,
}
