//! Integration test for `ReturnsEngine::get_returns`: a mid-period deposit
//! must be treated as an external cash flow and produce a positive XIRR
//! distinct from the portfolio's raw percentage growth.

mod common;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use aggregator_core::accounts::NewAccount;
use aggregator_core::activities::{ActivityType, NewActivity};
use aggregator_core::errors::Result;
use aggregator_core::portfolio::valuation::DailyHoldingValue;
use aggregator_core::utils::time_utils::yesterday_local;

use common::Harness;

/// Mirrors the engine's own month-clamped subtraction (`day` clamped to the
/// target month's last day) so the test can anchor a "1M" window without
/// depending on private period-resolution internals.
fn subtract_one_month_clamped(date: NaiveDate) -> NaiveDate {
    let total_months = date.year() * 12 + date.month0() as i32 - 1;
    let target_year = total_months.div_euclid(12);
    let target_month = total_months.rem_euclid(12) as u32 + 1;
    let (next_year, next_month) = if target_month == 12 { (target_year + 1, 1) } else { (target_year, target_month + 1) };
    let last_day = NaiveDate::from_ymd_opt(next_year, next_month, 1).unwrap().pred_opt().unwrap().day();
    NaiveDate::from_ymd_opt(target_year, target_month, date.day().min(last_day)).unwrap()
}

#[tokio::test]
async fn mid_period_deposit_is_treated_as_an_external_cash_flow() -> Result<()> {
    let h = Harness::new();
    let account = h
        .accounts
        .create(NewAccount {
            id: None,
            name: "Brokerage".to_string(),
            account_type: "INVESTMENT".to_string(),
            currency: "USD".to_string(),
            provider_name: None,
            external_id: None,
            institution_name: None,
            is_active: true,
            include_in_allocation: true,
        })
        .await?;

    let end = yesterday_local();
    let start = subtract_one_month_clamped(end);
    let deposit_date = start + (end - start) / 3;

    h.dhv
        .upsert_many(
            vec![DailyHoldingValue {
                valuation_date: start,
                account_id: account.id.clone(),
                account_snapshot_id: "seed-start".to_string(),
                security_id: "cash".to_string(),
                ticker: "_MAN:CASH".to_string(),
                quantity: dec!(10000),
                close_price: dec!(1),
                market_value: dec!(10000),
            }],
            true,
        )
        .await?;
    h.dhv
        .upsert_many(
            vec![DailyHoldingValue {
                valuation_date: end,
                account_id: account.id.clone(),
                account_snapshot_id: "seed-end".to_string(),
                security_id: "cash".to_string(),
                ticker: "_MAN:CASH".to_string(),
                quantity: dec!(16000),
                close_price: dec!(1),
                market_value: dec!(16000),
            }],
            true,
        )
        .await?;

    h.activities
        .create(NewActivity {
            id: None,
            account_id: account.id.clone(),
            security_id: None,
            activity_type: ActivityType::Deposit,
            activity_date: deposit_date,
            quantity: None,
            unit_price: None,
            amount: dec!(5000),
            currency: "USD".to_string(),
        })
        .await?;

    let report = h.returns_engine.get_returns(&account.id, Some(vec!["1M".to_string()]))?;
    let account_set = report.accounts.iter().find(|s| s.scope_id == account.id).expect("account scope present");
    let period = account_set.periods.iter().find(|p| p.period == "1M").expect("1M period present");

    assert_eq!(period.start_value, dec!(10000));
    assert_eq!(period.end_value, dec!(16000));
    assert!(period.has_sufficient_data);
    let irr = period.irr.expect("xirr should converge for this scenario");
    assert!(irr > Decimal::ZERO, "expected a positive return, got {irr}");
    // Growth from 10000 -> 16000 with no deposit would be a 60% raw gain;
    // the 5000 mid-period inflow means the money-weighted return is smaller.
    assert!(irr < dec!(0.6), "deposit-adjusted irr should be well under raw 60% growth, got {irr}");

    Ok(())
}
