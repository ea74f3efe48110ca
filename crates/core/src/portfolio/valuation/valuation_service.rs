//! The portfolio valuation engine (§4.2): reconciles sparse snapshots with
//! daily market-close prices into a dense `DailyHoldingValue` table.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;

use aggregator_market_data::PriceHistoryProvider;

use crate::accounts::AccountRepositoryTrait;
use crate::assets::{Security, SecurityRepositoryTrait};
use crate::errors::Result;
use crate::portfolio::snapshot::{AccountSnapshot, Holding, SnapshotRepositoryTrait};
use crate::utils::time_utils::{get_days_between, utc_to_local_date, yesterday_local};

use super::valuation_calculator::{build_price_lookup, quantize_market_value};
use super::valuation_model::{DailyHoldingValue, GapReport, ValuationResult};
use super::valuation_traits::ValuationRepositoryTrait;

struct Window {
    effective_date: NaiveDate,
    account_snapshot_id: String,
    holdings: Vec<Holding>,
}

pub struct ValuationEngine {
    accounts: Arc<dyn AccountRepositoryTrait>,
    snapshots: Arc<dyn SnapshotRepositoryTrait>,
    securities: Arc<dyn SecurityRepositoryTrait>,
    dhv: Arc<dyn ValuationRepositoryTrait>,
    equity_prices: Arc<dyn PriceHistoryProvider>,
    crypto_prices: Option<Arc<dyn PriceHistoryProvider>>,
}

impl ValuationEngine {
    pub fn new(
        accounts: Arc<dyn AccountRepositoryTrait>,
        snapshots: Arc<dyn SnapshotRepositoryTrait>,
        securities: Arc<dyn SecurityRepositoryTrait>,
        dhv: Arc<dyn ValuationRepositoryTrait>,
        equity_prices: Arc<dyn PriceHistoryProvider>,
        crypto_prices: Option<Arc<dyn PriceHistoryProvider>>,
    ) -> Self {
        Self {
            accounts,
            snapshots,
            securities,
            dhv,
            equity_prices,
            crypto_prices,
        }
    }

    /// §4.2 `Backfill()`: fills gaps from the per-account start date through
    /// yesterday.
    pub async fn backfill(&self) -> Result<ValuationResult> {
        let end = yesterday_local();
        let account_ids = self.snapshotted_account_ids()?;
        let Some(start) = self.determine_start(&account_ids, end, false)? else {
            return Ok(ValuationResult::default());
        };
        if start > end {
            return Ok(ValuationResult::default());
        }
        self.backfill_range(&account_ids, start, end, false).await
    }

    /// §4.2 `FullBackfill(repair)`: forces the start to each account's
    /// earliest successful sync.
    pub async fn full_backfill(&self, repair: bool) -> Result<ValuationResult> {
        let end = yesterday_local();
        let account_ids = self.snapshotted_account_ids()?;
        let Some(start) = self.determine_start(&account_ids, end, true)? else {
            return Ok(ValuationResult::default());
        };
        if start > end {
            return Ok(ValuationResult::default());
        }
        self.backfill_range(&account_ids, start, end, repair).await
    }

    /// §4.2 `DiagnoseGaps()`. A date is "missing" when it has no DHV rows at
    /// all, "partial" when it has some but fewer than the governing
    /// snapshot's holding count (at least one security's row failed to
    /// write). Both lists are capped at 100 entries (SPEC_FULL.md §C.1).
    pub fn diagnose_gaps(&self) -> Result<Vec<GapReport>> {
        const MAX_REPORTED_DATES: usize = 100;
        let end = yesterday_local();
        let mut reports = Vec::new();
        for account_id in self.snapshotted_account_ids()? {
            let Some(start) = self.account_start_date(&account_id, end, false)? else {
                continue;
            };
            if start > end {
                continue;
            }
            let covered: HashSet<NaiveDate> =
                self.dhv.covered_dates(&account_id, start, end)?.into_iter().collect();
            let mut missing: Vec<NaiveDate> = get_days_between(start, end)
                .into_iter()
                .filter(|d| !covered.contains(d))
                .collect();
            missing.truncate(MAX_REPORTED_DATES);

            let windows = self.resolve_timeline(&account_id, start, end)?;
            let mut actual_counts: HashMap<NaiveDate, usize> = HashMap::new();
            for row in self.dhv.rows_for_account_range(&account_id, start, end)? {
                *actual_counts.entry(row.valuation_date).or_insert(0) += 1;
            }

            let mut partial: Vec<NaiveDate> = covered
                .iter()
                .copied()
                .filter(|date| {
                    let Some(active) = windows
                        .iter()
                        .filter(|w| w.effective_date <= *date)
                        .max_by_key(|w| w.effective_date)
                    else {
                        return false;
                    };
                    // A window with no holdings writes exactly one sentinel row.
                    let expected = active.holdings.len().max(1);
                    actual_counts.get(date).copied().unwrap_or(0) < expected
                })
                .collect();
            partial.sort();
            partial.truncate(MAX_REPORTED_DATES);

            reports.push(GapReport {
                account_id,
                expected_start: start,
                expected_end: end,
                missing_dates: missing,
                partial_dates: partial,
            });
        }
        Ok(reports)
    }

    /// Writes today's DHV rows directly from a just-written snapshot,
    /// without touching the rest of the backfill range (§4.1.1's "invoke
    /// Valuation (today only)").
    pub async fn write_daily_values_for_holdings(
        &self,
        snapshot: &AccountSnapshot,
        date: NaiveDate,
    ) -> Result<()> {
        let holdings = self.snapshots.get_holdings(&snapshot.id)?;
        let tickers = fetchable_tickers(&holdings);
        let crypto_tickers = self.securities.crypto_tickers()?.unwrap_or_default();
        let crypto_set: HashSet<&str> = crypto_tickers.iter().map(|s| s.as_str()).collect();
        let (crypto, equity): (Vec<String>, Vec<String>) =
            tickers.into_iter().partition(|t| crypto_set.contains(t.as_str()));

        let mut lookup = HashMap::new();
        if !equity.is_empty() {
            match self.equity_prices.price_history(&equity, date, date).await {
                Ok(history) => lookup.extend(build_price_lookup(&history, date, date)),
                Err(e) => warn!("equity price fetch failed for {date}: {e}"),
            }
        }
        if !crypto.is_empty() {
            if let Some(provider) = &self.crypto_prices {
                match provider.price_history(&crypto, date, date).await {
                    Ok(history) => lookup.extend(build_price_lookup(&history, date, date)),
                    Err(e) => warn!("crypto price fetch failed for {date}: {e}"),
                }
            }
        }

        let rows = value_holdings(&holdings, &snapshot.account_id, &snapshot.id, date, &lookup);
        self.dhv.delete_sentinel(&snapshot.account_id, date).await?;
        self.dhv.upsert_many(rows, false).await
    }

    pub async fn delete_zero_balance_sentinel(&self, account_id: &str, date: NaiveDate) -> Result<()> {
        self.dhv.delete_sentinel(account_id, date).await
    }

    pub async fn write_zero_balance_sentinel(
        &self,
        account_id: &str,
        snapshot: &AccountSnapshot,
        date: NaiveDate,
    ) -> Result<()> {
        let zero_balance = self.securities.get_or_create_zero_balance_security().await?;
        self.dhv.delete_real_rows(account_id, date).await?;
        self.dhv
            .upsert_many(
                vec![DailyHoldingValue {
                    valuation_date: date,
                    account_id: account_id.to_string(),
                    account_snapshot_id: snapshot.id.clone(),
                    security_id: zero_balance.id,
                    ticker: zero_balance.ticker,
                    quantity: Decimal::ZERO,
                    close_price: Decimal::ZERO,
                    market_value: Decimal::ZERO,
                }],
                true,
            )
            .await
    }

    fn snapshotted_account_ids(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        for account in self.accounts.list(None, None)? {
            if self.snapshots.earliest_success_snapshot(&account.id)?.is_some() {
                ids.push(account.id);
            }
        }
        Ok(ids)
    }

    fn account_start_date(
        &self,
        account_id: &str,
        end: NaiveDate,
        force_earliest: bool,
    ) -> Result<Option<NaiveDate>> {
        if !force_earliest {
            if let Some(max_date) = self.dhv.max_valuation_date(account_id)? {
                return Ok(Some((max_date + chrono::Duration::days(1)).min(end + chrono::Duration::days(1))));
            }
        }
        Ok(self
            .snapshots
            .earliest_success_snapshot(account_id)?
            .map(|s| utc_to_local_date(s.session_timestamp)))
    }

    /// §4.2.1: the minimum across accounts of each account's own start date.
    /// A global max would silently skip stragglers forever.
    fn determine_start(
        &self,
        account_ids: &[String],
        end: NaiveDate,
        force_earliest: bool,
    ) -> Result<Option<NaiveDate>> {
        let mut min_start: Option<NaiveDate> = None;
        for account_id in account_ids {
            if let Some(start) = self.account_start_date(account_id, end, force_earliest)? {
                min_start = Some(min_start.map_or(start, |m: NaiveDate| m.min(start)));
            }
        }
        Ok(min_start)
    }

    async fn backfill_range(
        &self,
        account_ids: &[String],
        start: NaiveDate,
        end: NaiveDate,
        repair: bool,
    ) -> Result<ValuationResult> {
        let mut result = ValuationResult::default();

        let mut windows_by_account: HashMap<String, Vec<Window>> = HashMap::new();
        let mut all_tickers: HashSet<String> = HashSet::new();
        for account_id in account_ids {
            let windows = self.resolve_timeline(account_id, start, end)?;
            for w in &windows {
                all_tickers.extend(fetchable_tickers(&w.holdings));
            }
            windows_by_account.insert(account_id.clone(), windows);
        }

        let crypto_tickers = self.securities.crypto_tickers()?.unwrap_or_default();
        let crypto_set: HashSet<&str> = crypto_tickers.iter().map(|s| s.as_str()).collect();
        let (crypto, equity): (Vec<String>, Vec<String>) =
            all_tickers.into_iter().partition(|t| crypto_set.contains(t.as_str()));

        let mut lookup = HashMap::new();
        if !equity.is_empty() {
            match self.equity_prices.price_history(&equity, start, end).await {
                Ok(history) => lookup.extend(build_price_lookup(&history, start, end)),
                Err(e) => result.errors.push(format!("equity price fetch failed: {e}")),
            }
        }
        if !crypto.is_empty() {
            if let Some(provider) = &self.crypto_prices {
                match provider.price_history(&crypto, start, end).await {
                    Ok(history) => lookup.extend(build_price_lookup(&history, start, end)),
                    Err(e) => result.errors.push(format!("crypto price fetch failed: {e}")),
                }
            }
        }

        let zero_balance = self.securities.get_or_create_zero_balance_security().await?;

        let mut produced_sentinel: HashSet<(String, NaiveDate)> = HashSet::new();
        let mut produced_real: HashSet<(String, NaiveDate)> = HashSet::new();
        let mut all_rows = Vec::new();

        let days = get_days_between(start, end);
        for date in &days {
            for account_id in account_ids {
                let Some(windows) = windows_by_account.get(account_id) else { continue };
                let Some(active) = windows
                    .iter()
                    .filter(|w| w.effective_date <= *date)
                    .max_by_key(|w| w.effective_date)
                else {
                    continue;
                };
                if active.holdings.is_empty() {
                    produced_sentinel.insert((account_id.clone(), *date));
                    all_rows.push(DailyHoldingValue {
                        valuation_date: *date,
                        account_id: account_id.clone(),
                        account_snapshot_id: active.account_snapshot_id.clone(),
                        security_id: zero_balance.id.clone(),
                        ticker: zero_balance.ticker.clone(),
                        quantity: Decimal::ZERO,
                        close_price: Decimal::ZERO,
                        market_value: Decimal::ZERO,
                    });
                } else {
                    produced_real.insert((account_id.clone(), *date));
                    all_rows.extend(value_holdings(
                        &active.holdings,
                        account_id,
                        &active.account_snapshot_id,
                        *date,
                        &lookup,
                    ));
                }
            }
        }

        for (account_id, date) in &produced_sentinel {
            if !produced_real.contains(&(account_id.clone(), *date)) {
                self.dhv.delete_real_rows(account_id, *date).await?;
            }
        }
        for (account_id, date) in &produced_real {
            if !produced_sentinel.contains(&(account_id.clone(), *date)) {
                self.dhv.delete_sentinel(account_id, *date).await?;
            }
        }

        self.dhv.upsert_many(all_rows, repair).await?;
        result.dates_calculated = days.len();
        Ok(result)
    }

    /// §4.2.2: classify each account's successful snapshots into a baseline
    /// window (effective from `start`) and transition windows at their own
    /// local dates.
    fn resolve_timeline(&self, account_id: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<Window>> {
        let snapshots = self.snapshots.list_success_snapshots(account_id)?;
        let mut windows = Vec::new();
        let mut baseline: Option<&AccountSnapshot> = None;
        for snapshot in &snapshots {
            let local_date = utc_to_local_date(snapshot.session_timestamp);
            if local_date <= start {
                if baseline.map_or(true, |b| utc_to_local_date(b.session_timestamp) <= local_date) {
                    baseline = Some(snapshot);
                }
            } else if local_date <= end {
                windows.push(Window {
                    effective_date: local_date,
                    account_snapshot_id: snapshot.id.clone(),
                    holdings: self.snapshots.get_holdings(&snapshot.id)?,
                });
            }
        }
        if let Some(b) = baseline {
            windows.push(Window {
                effective_date: start,
                account_snapshot_id: b.id.clone(),
                holdings: self.snapshots.get_holdings(&b.id)?,
            });
        }
        Ok(windows)
    }
}

fn fetchable_tickers(holdings: &[Holding]) -> Vec<String> {
    holdings
        .iter()
        .map(|h| h.ticker.clone())
        .filter(|t| !is_excluded_from_market_data(t))
        .collect()
}

fn is_excluded_from_market_data(ticker: &str) -> bool {
    Security::is_cash_equivalent(ticker) || ticker.starts_with("_MAN:") || ticker.starts_with("_SF:")
}

fn value_holdings(
    holdings: &[Holding],
    account_id: &str,
    account_snapshot_id: &str,
    date: NaiveDate,
    lookup: &HashMap<String, HashMap<NaiveDate, Decimal>>,
) -> Vec<DailyHoldingValue> {
    holdings
        .iter()
        .map(|h| {
            let close_price = if Security::is_cash_equivalent(&h.ticker) {
                Decimal::ONE
            } else {
                lookup
                    .get(&h.ticker)
                    .and_then(|m| m.get(&date).copied())
                    .unwrap_or(h.snapshot_price)
            };
            DailyHoldingValue {
                valuation_date: date,
                account_id: account_id.to_string(),
                account_snapshot_id: account_snapshot_id.to_string(),
                security_id: h.security_id.clone(),
                ticker: h.ticker.clone(),
                quantity: h.quantity,
                close_price,
                market_value: quantize_market_value(h.quantity, close_price),
            }
        })
        .collect()
}
