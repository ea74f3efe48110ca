//! Repository contract for the daily holding value table.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::valuation_model::DailyHoldingValue;
use crate::errors::Result;

#[async_trait]
pub trait ValuationRepositoryTrait: Send + Sync {
    fn max_valuation_date(&self, account_id: &str) -> Result<Option<NaiveDate>>;

    /// Upserts on `(valuation_date, account_id, security_id)`. When
    /// `repair` is true, `quantity` and `account_snapshot_id` are also
    /// overwritten on an existing row; otherwise only price/value update.
    async fn upsert_many(&self, rows: Vec<DailyHoldingValue>, repair: bool) -> Result<()>;

    async fn delete_real_rows(&self, account_id: &str, date: NaiveDate) -> Result<()>;
    async fn delete_sentinel(&self, account_id: &str, date: NaiveDate) -> Result<()>;

    fn rows_for_account_range(
        &self,
        account_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyHoldingValue>>;

    /// Sum of `market_value` across `account_ids` for a single date — the
    /// building block for the returns engine's `V(date)`.
    fn sum_market_value(&self, account_ids: &[String], date: NaiveDate) -> Result<Decimal>;

    /// Distinct dates with any row for the account, ascending — used by
    /// `DiagnoseGaps` to find holes in coverage.
    fn covered_dates(&self, account_id: &str, from: NaiveDate, to: NaiveDate) -> Result<Vec<NaiveDate>>;
}
