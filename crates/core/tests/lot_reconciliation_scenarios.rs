//! Integration tests for the tax-lot reconciliation engine's Phase 1
//! (seed) and Phase 2 (delta) logic against a real SQLite-backed repository
//! stack, reproducing the narrative scenarios from the aggregation model:
//! first-sync seeding, a buy growing a position alongside an activity,
//! and a FIFO sell spanning two lots with no matching activity.

mod common;

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use aggregator_core::accounts::NewAccount;
use aggregator_core::activities::{ActivityType, NewActivity};
use aggregator_core::assets::NewSecurity;
use aggregator_core::errors::Result;
use aggregator_core::portfolio::lots::{DisposalSource, LotSource, NewHoldingLot};
use aggregator_core::portfolio::snapshot::{NewAccountSnapshot, NewHolding, SnapshotStatus};
use aggregator_core::sync::SyncSession;

use common::Harness;

#[tokio::test]
async fn first_sync_seeds_one_initial_lot_at_snapshot_price() -> Result<()> {
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

    let session_timestamp = NaiveDate::from_ymd_opt(2024, 1, 10)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    h.snapshots
        .create_snapshot(
            NewAccountSnapshot {
                account_id: account.id.clone(),
                sync_session_id: "s1".to_string(),
                session_timestamp,
                status: SnapshotStatus::Success,
                total_value: dec!(15000),
                balance_date: None,
            },
            vec![NewHolding {
                security_id: aapl.id.clone(),
                ticker: "AAPL".to_string(),
                quantity: dec!(100),
                snapshot_price: dec!(150),
                snapshot_value: dec!(15000),
                provider_cost_basis: None,
            }],
        )
        .await?;

    h.lot_engine
        .reconcile_account(&account.id, &SyncSession::new("s1".to_string()))
        .await?;

    let lots = h.lots.list_lots_for_account(&account.id)?;
    assert_eq!(lots.len(), 1);
    let lot = &lots[0];
    assert_eq!(lot.source, LotSource::Initial);
    assert_eq!(lot.acquisition_date, None);
    assert_eq!(lot.cost_basis_per_unit, dec!(150));
    assert_eq!(lot.original_quantity, dec!(100));
    assert_eq!(lot.current_quantity, dec!(100));
    assert!(!lot.is_closed);
    Ok(())
}

#[tokio::test]
async fn buy_growing_a_position_splits_into_an_activity_lot_and_an_inferred_lot() -> Result<()> {
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

    let t0 = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap().and_hms_opt(12, 0, 0).unwrap();
    h.snapshots
        .create_snapshot(
            NewAccountSnapshot {
                account_id: account.id.clone(),
                sync_session_id: "s1".to_string(),
                session_timestamp: t0,
                status: SnapshotStatus::Success,
                total_value: dec!(15000),
                balance_date: None,
            },
            vec![NewHolding {
                security_id: aapl.id.clone(),
                ticker: "AAPL".to_string(),
                quantity: dec!(100),
                snapshot_price: dec!(150),
                snapshot_value: dec!(15000),
                provider_cost_basis: None,
            }],
        )
        .await?;
    h.lot_engine
        .reconcile_account(&account.id, &SyncSession::new("s1".to_string()))
        .await?;

    let buy_date = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
    h.activities
        .create(NewActivity {
            id: None,
            account_id: account.id.clone(),
            security_id: Some(aapl.id.clone()),
            activity_type: ActivityType::Buy,
            activity_date: buy_date,
            quantity: Some(dec!(30)),
            unit_price: Some(dec!(148)),
            amount: dec!(-4440),
            currency: "USD".to_string(),
        })
        .await?;

    let t2 = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap().and_hms_opt(12, 0, 0).unwrap();
    h.snapshots
        .create_snapshot(
            NewAccountSnapshot {
                account_id: account.id.clone(),
                sync_session_id: "s2".to_string(),
                session_timestamp: t2,
                status: SnapshotStatus::Success,
                total_value: dec!(22650),
                balance_date: None,
            },
            vec![NewHolding {
                security_id: aapl.id.clone(),
                ticker: "AAPL".to_string(),
                quantity: dec!(150),
                snapshot_price: dec!(151),
                snapshot_value: dec!(22650),
                provider_cost_basis: None,
            }],
        )
        .await?;

    h.lot_engine
        .reconcile_account(&account.id, &SyncSession::new("s2".to_string()))
        .await?;

    let mut lots = h.lots.list_lots_for_account(&account.id)?;
    lots.sort_by_key(|l| l.original_quantity);
    assert_eq!(lots.len(), 3);

    let initial = lots.iter().find(|l| l.source == LotSource::Initial).unwrap();
    assert_eq!(initial.current_quantity, dec!(100));

    let activity_lot = lots.iter().find(|l| l.source == LotSource::Activity).unwrap();
    assert_eq!(activity_lot.original_quantity, dec!(30));
    assert_eq!(activity_lot.cost_basis_per_unit, dec!(148));
    assert_eq!(activity_lot.acquisition_date, Some(buy_date));

    let inferred = lots.iter().find(|l| l.source == LotSource::Inferred).unwrap();
    assert_eq!(inferred.original_quantity, dec!(20));
    assert_eq!(inferred.cost_basis_per_unit, dec!(151));
    assert_eq!(inferred.acquisition_date, None);

    Ok(())
}

#[tokio::test]
async fn sell_with_no_matching_activity_disposes_fifo_across_two_lots() -> Result<()> {
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

    // Directly seed two open lots, bypassing the engine's own seed phase.
    let older = h
        .lots
        .create_lot(NewHoldingLot {
            account_id: account.id.clone(),
            security_id: aapl.id.clone(),
            ticker: "AAPL".to_string(),
            acquisition_date: Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            cost_basis_per_unit: dec!(120),
            original_quantity: dec!(40),
            current_quantity: dec!(40),
            source: LotSource::Manual,
            activity_id: None,
        })
        .await?;
    let newer = h
        .lots
        .create_lot(NewHoldingLot {
            account_id: account.id.clone(),
            security_id: aapl.id.clone(),
            ticker: "AAPL".to_string(),
            acquisition_date: Some(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()),
            cost_basis_per_unit: dec!(140),
            original_quantity: dec!(60),
            current_quantity: dec!(60),
            source: LotSource::Manual,
            activity_id: None,
        })
        .await?;

    let t0 = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
    h.snapshots
        .create_snapshot(
            NewAccountSnapshot {
                account_id: account.id.clone(),
                sync_session_id: "s0".to_string(),
                session_timestamp: t0,
                status: SnapshotStatus::Success,
                total_value: dec!(13000),
                balance_date: None,
            },
            vec![NewHolding {
                security_id: aapl.id.clone(),
                ticker: "AAPL".to_string(),
                quantity: dec!(100),
                snapshot_price: dec!(130),
                snapshot_value: dec!(13000),
                provider_cost_basis: None,
            }],
        )
        .await?;
    // Note: no reconcile_account call here — this snapshot is only the
    // `prev` baseline for the delta below, and its quantity (100) already
    // matches the two seeded lots, so a real first sync's seed phase would
    // be a no-op too.

    let t1 = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
    h.snapshots
        .create_snapshot(
            NewAccountSnapshot {
                account_id: account.id.clone(),
                sync_session_id: "s1".to_string(),
                session_timestamp: t1,
                status: SnapshotStatus::Success,
                total_value: dec!(6750),
                balance_date: None,
            },
            vec![NewHolding {
                security_id: aapl.id.clone(),
                ticker: "AAPL".to_string(),
                quantity: dec!(50),
                snapshot_price: dec!(135),
                snapshot_value: dec!(6750),
                provider_cost_basis: None,
            }],
        )
        .await?;

    h.lot_engine
        .reconcile_account(&account.id, &SyncSession::new("s1".to_string()))
        .await?;

    let lots = h.lots.list_lots_for_account(&account.id)?;
    assert_eq!(lots.len(), 2, "shrink with full coverage creates no new lot");

    let older = lots.iter().find(|l| l.id == older.id).unwrap();
    assert_eq!(older.current_quantity, dec!(0));
    assert!(older.is_closed);

    let newer = lots.iter().find(|l| l.id == newer.id).unwrap();
    assert_eq!(newer.current_quantity, dec!(50));
    assert!(!newer.is_closed);

    let mut disposals = h.lots.list_disposals_for_account(&account.id)?;
    disposals.sort_by_key(|d| d.quantity);
    assert_eq!(disposals.len(), 2);
    assert_eq!(disposals[0].quantity, dec!(10));
    assert_eq!(disposals[1].quantity, dec!(40));
    assert_eq!(disposals[0].disposal_group_id, disposals[1].disposal_group_id);
    for d in &disposals {
        assert_eq!(d.source, DisposalSource::Inferred);
        assert_eq!(d.proceeds_per_unit, dec!(135));
    }

    Ok(())
}
