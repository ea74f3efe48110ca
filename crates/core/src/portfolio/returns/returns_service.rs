//! `GetReturns` (§4.4): money-weighted returns for the portfolio or a
//! single account over named calendar windows.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::accounts::AccountRepositoryTrait;
use crate::activities::ActivityRepositoryTrait;
use crate::errors::Result;
use crate::portfolio::snapshot::SnapshotRepositoryTrait;
use crate::portfolio::valuation::ValuationRepositoryTrait;
use crate::utils::time_utils::yesterday_local;

use super::returns_calculator::{external_cash_flows, xirr};
use super::returns_model::{PeriodReturn, ReturnSet, ReturnsReport, DEFAULT_PERIODS};
use super::returns_periods::resolve_period;

pub struct ReturnsEngine {
    accounts: Arc<dyn AccountRepositoryTrait>,
    snapshots: Arc<dyn SnapshotRepositoryTrait>,
    activities: Arc<dyn ActivityRepositoryTrait>,
    dhv: Arc<dyn ValuationRepositoryTrait>,
}

impl ReturnsEngine {
    pub fn new(
        accounts: Arc<dyn AccountRepositoryTrait>,
        snapshots: Arc<dyn SnapshotRepositoryTrait>,
        activities: Arc<dyn ActivityRepositoryTrait>,
        dhv: Arc<dyn ValuationRepositoryTrait>,
    ) -> Self {
        Self { accounts, snapshots, activities, dhv }
    }

    /// `scope` is `"all"`, `"portfolio"`, or a specific account id.
    pub fn get_returns(&self, scope: &str, periods: Option<Vec<String>>) -> Result<ReturnsReport> {
        let period_list = periods.unwrap_or_else(|| {
            DEFAULT_PERIODS.iter().map(|s| s.to_string()).collect()
        });
        let yesterday = yesterday_local();
        let mut report = ReturnsReport::default();

        if scope == "all" || scope == "portfolio" {
            let account_ids = self.allocation_eligible_account_ids()?;
            let periods_out = period_list
                .iter()
                .map(|p| self.compute_period(None, &account_ids, p, yesterday))
                .collect::<Result<Vec<_>>>()?;
            report.portfolio = Some(ReturnSet {
                scope_id: "portfolio".to_string(),
                scope_name: "Portfolio".to_string(),
                periods: periods_out,
            });
        }

        let account_scopes: Vec<String> = if scope == "all" {
            self.accounts.list(None, None)?.into_iter().map(|a| a.id).collect()
        } else if scope == "portfolio" {
            Vec::new()
        } else {
            vec![scope.to_string()]
        };

        for account_id in account_scopes {
            let account = self.accounts.get_by_id(&account_id)?;
            let periods_out = period_list
                .iter()
                .map(|p| self.compute_period(Some(&account_id), std::slice::from_ref(&account_id), p, yesterday))
                .collect::<Result<Vec<_>>>()?;
            report.accounts.push(ReturnSet {
                scope_id: account_id,
                scope_name: account.name,
                periods: periods_out,
            });
        }

        Ok(report)
    }

    fn allocation_eligible_account_ids(&self) -> Result<Vec<String>> {
        Ok(self
            .accounts
            .list(Some(true), None)?
            .into_iter()
            .filter(|a| a.include_in_allocation)
            .map(|a| a.id)
            .collect())
    }

    fn compute_period(
        &self,
        liquidation_account_id: Option<&str>,
        account_ids: &[String],
        period: &str,
        yesterday: NaiveDate,
    ) -> Result<PeriodReturn> {
        let (start, end) = resolve_period(period, yesterday)?;
        let start_value = self.dhv.sum_market_value(account_ids, start)?;
        let mut end_value = self.dhv.sum_market_value(account_ids, end)?;

        let mut liquidation_inferred = false;
        if let Some(account_id) = liquidation_account_id {
            if start_value > Decimal::ZERO && self.dhv.covered_dates(account_id, end, end)?.is_empty() {
                if let Some(snapshot) = self
                    .snapshots
                    .latest_success_snapshot_before(account_id, end.and_hms_opt(23, 59, 59).unwrap())?
                {
                    if snapshot.total_value == Decimal::ZERO {
                        liquidation_inferred = true;
                        end_value = Decimal::ZERO;
                    }
                }
            }
        }

        let activities = self.activities.list_for_accounts(account_ids, start, end)?;
        let flows = external_cash_flows(&activities);
        let cash_flow_sum: Decimal = flows.iter().map(|cf| cf.amount).sum();

        let has_sufficient_data =
            start_value > Decimal::ZERO || cash_flow_sum != Decimal::ZERO || liquidation_inferred;
        let irr = if has_sufficient_data {
            xirr(start, end, start_value, end_value, &flows)
        } else {
            None
        };

        Ok(PeriodReturn {
            period: period.to_string(),
            start_date: start,
            end_date: end,
            start_value,
            end_value,
            irr,
            has_sufficient_data,
        })
    }
}
