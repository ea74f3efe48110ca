//! Returns engine domain model (§4.4): period-date resolution and the
//! result shapes `GetReturns` returns.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The fixed set of named windows `GetReturns` computes when the caller
/// does not ask for specific ones (§4.4's default `periods`).
pub const DEFAULT_PERIODS: &[&str] =
    &["1D", "1M", "3M", "QTD", "YTD", "1Y", "3Y", "LQ", "LY"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodReturn {
    pub period: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_value: Decimal,
    pub end_value: Decimal,
    pub irr: Option<Decimal>,
    pub has_sufficient_data: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnSet {
    pub scope_id: String,
    pub scope_name: String,
    pub periods: Vec<PeriodReturn>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReturnsReport {
    pub portfolio: Option<ReturnSet>,
    pub accounts: Vec<ReturnSet>,
}

/// A single point in the money-weighted cash-flow series fed to XIRR: a
/// signed amount on a date, where the start/end portfolio values are
/// themselves modeled as flows at `t_start` (negative, the "purchase" of
/// the existing position) and `t_end` (positive, its "sale").
#[derive(Debug, Clone, Copy)]
pub struct CashFlow {
    pub date: NaiveDate,
    pub amount: Decimal,
}
