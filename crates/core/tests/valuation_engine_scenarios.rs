//! Integration tests for the valuation engine's daily backfill: the
//! sentinel/real-row transition on liquidation, and carry-forward pricing
//! across a weekend when a real price provider is wired in.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

use aggregator_core::accounts::NewAccount;
use aggregator_core::assets::{NewSecurity, ZERO_BALANCE_TICKER};
use aggregator_core::errors::Result;
use aggregator_core::portfolio::snapshot::{NewAccountSnapshot, NewHolding, SnapshotStatus};
use aggregator_market_data::{ClosePrice, MarketDataError, NullPriceHistoryProvider, PriceHistoryProvider, PriceHistoryResult};

use common::Harness;

async fn new_brokerage_account(h: &Harness) -> Result<aggregator_core::accounts::Account> {
    h.accounts
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
        .await
}

#[tokio::test]
async fn liquidation_transitions_real_holdings_to_a_zero_balance_sentinel() -> Result<()> {
    let h = Harness::new();
    let account = new_brokerage_account(&h).await?;
    let aapl = h
        .securities
        .create(NewSecurity {
            id: None,
            ticker: "AAPL".to_string(),
            name: Some("Apple Inc.".to_string()),
            currency: "USD".to_string(),
            manual_asset_class_id: None,
        })
        .await?;

    let day_n = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    h.snapshots
        .create_snapshot(
            NewAccountSnapshot {
                account_id: account.id.clone(),
                sync_session_id: "s0".to_string(),
                session_timestamp: day_n.and_hms_opt(12, 0, 0).unwrap(),
                status: SnapshotStatus::Success,
                total_value: dec!(1000),
                balance_date: None,
            },
            vec![NewHolding {
                security_id: aapl.id.clone(),
                ticker: "AAPL".to_string(),
                quantity: dec!(10),
                snapshot_price: dec!(100),
                snapshot_value: dec!(1000),
                provider_cost_basis: None,
            }],
        )
        .await?;

    let day_n1 = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
    h.snapshots
        .create_snapshot(
            NewAccountSnapshot {
                account_id: account.id.clone(),
                sync_session_id: "s1".to_string(),
                session_timestamp: day_n1.and_hms_opt(12, 0, 0).unwrap(),
                status: SnapshotStatus::Success,
                total_value: dec!(0),
                balance_date: None,
            },
            vec![],
        )
        .await?;

    let engine = h.valuation_engine(Arc::new(NullPriceHistoryProvider));
    engine.full_backfill(false).await?;

    let day_n_rows = h.dhv.rows_for_account_range(&account.id, day_n, day_n)?;
    assert_eq!(day_n_rows.len(), 1);
    assert_eq!(day_n_rows[0].ticker, "AAPL");
    assert_eq!(day_n_rows[0].quantity, dec!(10));
    assert_eq!(day_n_rows[0].close_price, dec!(100));
    assert_eq!(day_n_rows[0].market_value, dec!(1000));

    let day_n1_rows = h.dhv.rows_for_account_range(&account.id, day_n1, day_n1)?;
    assert_eq!(day_n1_rows.len(), 1);
    assert_eq!(day_n1_rows[0].ticker, ZERO_BALANCE_TICKER);
    assert_eq!(day_n1_rows[0].quantity, dec!(0));
    assert_eq!(day_n1_rows[0].market_value, dec!(0));

    Ok(())
}

/// Two closes a business-week apart (Friday, the following Monday); every
/// day between them should carry forward Friday's close.
struct FridayMondayProvider;

#[async_trait]
impl PriceHistoryProvider for FridayMondayProvider {
    fn id(&self) -> &'static str {
        "fixed-friday-monday"
    }

    async fn price_history(
        &self,
        symbols: &[String],
        _from: NaiveDate,
        _to: NaiveDate,
    ) -> std::result::Result<PriceHistoryResult, MarketDataError> {
        let mut result = PriceHistoryResult::new();
        for symbol in symbols {
            result.insert(
                symbol.clone(),
                vec![
                    ClosePrice { date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(), close: dec!(150) },
                    ClosePrice { date: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(), close: dec!(155) },
                ],
            );
        }
        Ok(result)
    }
}

#[tokio::test]
async fn weekend_days_carry_forward_fridays_close() -> Result<()> {
    let h = Harness::new();
    let account = new_brokerage_account(&h).await?;
    let aapl = h
        .securities
        .create(NewSecurity {
            id: None,
            ticker: "AAPL".to_string(),
            name: Some("Apple Inc.".to_string()),
            currency: "USD".to_string(),
            manual_asset_class_id: None,
        })
        .await?;

    let friday = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
    h.snapshots
        .create_snapshot(
            NewAccountSnapshot {
                account_id: account.id.clone(),
                sync_session_id: "s0".to_string(),
                session_timestamp: friday.and_hms_opt(12, 0, 0).unwrap(),
                status: SnapshotStatus::Success,
                total_value: dec!(1500),
                balance_date: None,
            },
            vec![NewHolding {
                security_id: aapl.id.clone(),
                ticker: "AAPL".to_string(),
                quantity: dec!(10),
                snapshot_price: dec!(150),
                snapshot_value: dec!(1500),
                provider_cost_basis: None,
            }],
        )
        .await?;

    let engine = h.valuation_engine(Arc::new(FridayMondayProvider));
    engine.full_backfill(false).await?;

    let saturday = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
    let sunday = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
    let monday = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();

    for carried_day in [saturday, sunday] {
        let rows = h.dhv.rows_for_account_range(&account.id, carried_day, carried_day)?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].close_price, dec!(150), "must carry forward Friday's close on {carried_day}");
        assert_eq!(rows[0].market_value, dec!(1500));
    }

    let monday_rows = h.dhv.rows_for_account_range(&account.id, monday, monday)?;
    assert_eq!(monday_rows.len(), 1);
    assert_eq!(monday_rows[0].close_price, dec!(155));
    assert_eq!(monday_rows[0].market_value, dec!(1550));

    Ok(())
}
