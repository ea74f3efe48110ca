//! Integration test for the sync orchestrator's per-account staleness gate
//! (`sync_account`): a second sync reporting the same balance timestamp as
//! the previous one must be recorded as stale without writing a new snapshot.

mod common;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

use aggregator_core::accounts::SyncStatus;
use aggregator_core::errors::Result;
use aggregator_core::sync::{ProviderAccount, ProviderAdapter, ProviderHolding, ProviderSyncResult};

use common::Harness;

/// Reports the same account and a fixed balance timestamp on every call,
/// counting how many times it has been invoked.
struct FixedBalanceProvider {
    calls: AtomicUsize,
}

#[async_trait]
impl ProviderAdapter for FixedBalanceProvider {
    fn provider_name(&self) -> &str {
        "fake-broker"
    }

    async fn sync_all(&self) -> Result<ProviderSyncResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let balance_timestamp = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(16, 0, 0)
            .unwrap();

        let mut balance_dates = HashMap::new();
        balance_dates.insert("ext-1".to_string(), balance_timestamp);

        Ok(ProviderSyncResult {
            accounts: vec![ProviderAccount {
                external_id: "ext-1".to_string(),
                name: "Fake Brokerage".to_string(),
                institution_name: "Fake Bank".to_string(),
                account_number: None,
                account_type: Some("INVESTMENT".to_string()),
                currency: Some("USD".to_string()),
            }],
            holdings: vec![ProviderHolding {
                account_external_id: "ext-1".to_string(),
                symbol: "AAPL".to_string(),
                quantity: dec!(10),
                price: dec!(150),
                market_value: dec!(1500),
                currency: "USD".to_string(),
                name: Some("Apple Inc.".to_string()),
                cost_basis: None,
            }],
            activities: vec![],
            errors: vec![],
            balance_dates,
        })
    }
}

#[tokio::test]
async fn second_sync_with_unchanged_balance_date_is_marked_stale() -> Result<()> {
    let h = Harness::new();
    h.provider_registry.set_enabled("fake-broker", true).await?;

    let provider = Arc::new(FixedBalanceProvider { calls: AtomicUsize::new(0) });
    let orchestrator = h.orchestrator(vec![provider.clone()]);

    orchestrator.trigger_sync().await?;
    let account = h
        .accounts
        .find_by_provider_external_id("fake-broker", "ext-1")?
        .expect("account created by first sync");
    assert_eq!(account.last_sync_status, Some(SyncStatus::Success));
    assert_eq!(account.balance_date, Some(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()));

    let snapshots_after_first = h.snapshots.list_success_snapshots(&account.id)?;
    assert_eq!(snapshots_after_first.len(), 1);

    orchestrator.trigger_sync().await?;
    let account = h
        .accounts
        .find_by_provider_external_id("fake-broker", "ext-1")?
        .expect("account still present after second sync");
    assert_eq!(account.last_sync_status, Some(SyncStatus::Stale));

    let snapshots_after_second = h.snapshots.list_success_snapshots(&account.id)?;
    assert_eq!(
        snapshots_after_second.len(),
        1,
        "a stale sync must not write a new snapshot"
    );
    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);

    Ok(())
}
