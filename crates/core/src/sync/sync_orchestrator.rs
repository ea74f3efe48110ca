//! The sync orchestrator (§4.1): pulls from every enabled provider under a
//! single-writer lock and merges the result into accounts, snapshots,
//! holdings, and activities.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use log::{error, info, warn};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::sync_model::{
    ProviderAdapter, ProviderHolding, ProviderLogStatus, ProviderSyncResult, SyncLogEntry,
    SyncSession,
};
use super::sync_traits::SyncSessionRepositoryTrait;
use crate::accounts::{Account, AccountRepositoryTrait, NewAccount, ProviderRegistryTrait, SyncStatus};
use crate::activities::{ActivityRepositoryTrait, ActivityType, NewActivity};
use crate::assets::SecurityRepositoryTrait;
use crate::assets::NewSecurity;
use crate::errors::{Error, Result, SyncError};
use crate::portfolio::lots::LotReconciliationEngine;
use crate::portfolio::snapshot::{NewAccountSnapshot, NewHolding, SnapshotRepositoryTrait, SnapshotStatus};
use crate::portfolio::valuation::ValuationEngine;
use crate::utils::time_utils::utc_to_local_date;

pub struct SyncOrchestrator {
    lock: Mutex<()>,
    providers: Vec<Arc<dyn ProviderAdapter>>,
    provider_registry: Arc<dyn ProviderRegistryTrait>,
    accounts: Arc<dyn AccountRepositoryTrait>,
    activities: Arc<dyn ActivityRepositoryTrait>,
    snapshots: Arc<dyn SnapshotRepositoryTrait>,
    securities: Arc<dyn SecurityRepositoryTrait>,
    sessions: Arc<dyn SyncSessionRepositoryTrait>,
    valuation: Arc<ValuationEngine>,
    lots: Arc<LotReconciliationEngine>,
}

impl SyncOrchestrator {
    pub fn new(
        providers: Vec<Arc<dyn ProviderAdapter>>,
        provider_registry: Arc<dyn ProviderRegistryTrait>,
        accounts: Arc<dyn AccountRepositoryTrait>,
        activities: Arc<dyn ActivityRepositoryTrait>,
        snapshots: Arc<dyn SnapshotRepositoryTrait>,
        securities: Arc<dyn SecurityRepositoryTrait>,
        sessions: Arc<dyn SyncSessionRepositoryTrait>,
        valuation: Arc<ValuationEngine>,
        lots: Arc<LotReconciliationEngine>,
    ) -> Self {
        Self {
            lock: Mutex::new(()),
            providers,
            provider_registry,
            accounts,
            activities,
            snapshots,
            securities,
            sessions,
            valuation,
            lots,
        }
    }

    pub fn is_sync_in_progress(&self) -> bool {
        self.lock.try_lock().is_err()
    }

    pub async fn trigger_sync(&self) -> Result<SyncSession> {
        let _guard = self
            .lock
            .try_lock()
            .map_err(|_| Error::Sync(SyncError::SyncInProgress("*".to_string())))?;

        if let Err(e) = self.valuation.backfill().await {
            warn!("pre-sync valuation backfill failed (continuing sync): {e}");
        }

        let session_id = Uuid::new_v4().to_string();
        let mut session = SyncSession::new(session_id.clone());
        self.sessions.create(session.clone()).await?;

        let enabled: HashSet<String> = self
            .provider_registry
            .list()?
            .into_iter()
            .filter(|p| p.is_enabled)
            .map(|p| p.name)
            .collect();

        let mut any_synced_or_stale = false;

        for provider in &self.providers {
            if !enabled.contains(provider.provider_name()) {
                continue;
            }
            let outcome = self.sync_provider(provider.as_ref(), &session).await;
            match outcome {
                Ok(progressed) => any_synced_or_stale |= progressed,
                Err(e) => error!("provider '{}' sync failed: {e}", provider.provider_name()),
            }
        }

        session.is_complete = any_synced_or_stale;
        self.sessions
            .mark_complete(&session_id, session.error_message.clone())
            .await?;
        Ok(session)
    }

    /// Runs one provider end to end (steps b-k of §4.1). Returns whether any
    /// account of this provider ended the pass `success` or `stale`.
    async fn sync_provider(&self, provider: &dyn ProviderAdapter, session: &SyncSession) -> Result<bool> {
        let provider_name = provider.provider_name().to_string();

        let sync_result = match provider.sync_all().await {
            Ok(r) => r,
            Err(e) => {
                for account in self.accounts.list_active_by_provider(&provider_name)? {
                    self.accounts
                        .update_sync_status(&account.id, SyncStatus::Failed, Some(e.to_string()), None, None)
                        .await?;
                }
                self.sessions
                    .create_log_entry(SyncLogEntry {
                        id: Uuid::new_v4().to_string(),
                        sync_session_id: session.id.clone(),
                        provider_name,
                        status: ProviderLogStatus::Failed,
                        accounts_synced: 0,
                        accounts_stale: 0,
                        accounts_error: 0,
                        error_message: Some(e.to_string()),
                    })
                    .await?;
                return Ok(false);
            }
        };

        // c. upsert accounts
        let mut by_external_id: HashMap<String, Account> = HashMap::new();
        for pa in &sync_result.accounts {
            let existing = self
                .accounts
                .find_by_provider_external_id(&provider_name, &pa.external_id)?;
            let account = if let Some(existing) = existing {
                let name = if existing.name_user_edited {
                    None
                } else {
                    Some(pa.name.clone())
                };
                self.accounts
                    .upsert_from_provider(&existing.id, name, pa.institution_name.clone())
                    .await?
            } else {
                self.accounts
                    .create(NewAccount {
                        id: None,
                        name: pa.name.clone(),
                        account_type: pa.account_type.clone().unwrap_or_else(|| {
                            crate::accounts::DEFAULT_ACCOUNT_TYPE.to_string()
                        }),
                        currency: pa.currency.clone().unwrap_or_else(|| "USD".to_string()),
                        provider_name: Some(provider_name.clone()),
                        external_id: Some(pa.external_id.clone()),
                        institution_name: Some(pa.institution_name.clone()),
                        is_active: true,
                        include_in_allocation: true,
                    })
                    .await?
            };
            by_external_id.insert(pa.external_id.clone(), account);
        }
        // accounts already on file for this provider that this response didn't mention
        for account in self.accounts.list_active_by_provider(&provider_name)? {
            if let Some(ext) = account.external_id.clone() {
                by_external_id.entry(ext).or_insert(account);
            }
        }

        // d. apply structured errors to specific accounts
        for err in &sync_result.errors {
            let target = err
                .account_id
                .as_ref()
                .and_then(|id| by_external_id.get(id))
                .or_else(|| {
                    err.institution_name.as_ref().and_then(|inst| {
                        by_external_id
                            .values()
                            .find(|a| a.institution_name.as_deref().map(|n| n.eq_ignore_ascii_case(inst)).unwrap_or(false))
                    })
                });
            if let Some(account) = target {
                self.accounts
                    .update_sync_status(&account.id, SyncStatus::Error, Some(err.message.clone()), None, None)
                    .await?;
            }
        }

        // f. responded set
        let mut responded: HashSet<String> = HashSet::new();
        responded.extend(sync_result.accounts.iter().map(|a| a.external_id.clone()));
        responded.extend(sync_result.holdings.iter().map(|h| h.account_external_id.clone()));
        responded.extend(sync_result.balance_dates.keys().cloned());

        // g. provider-error guard: responders with nothing in holdings/balance_dates
        // while the provider reported errors are errors, not skips.
        let has_holdings_or_balance: HashSet<&String> = sync_result
            .holdings
            .iter()
            .map(|h| &h.account_external_id)
            .chain(sync_result.balance_dates.keys())
            .collect();
        let error_guarded: HashSet<String> = if sync_result.errors.is_empty() {
            HashSet::new()
        } else {
            responded
                .iter()
                .filter(|ext| !has_holdings_or_balance.contains(ext))
                .cloned()
                .collect()
        };

        let mut synced = 0u32;
        let mut stale = 0u32;
        let mut errored = 0u32;
        let mut messages = Vec::new();

        let holdings_by_account: HashMap<String, Vec<ProviderHolding>> = {
            let mut map: HashMap<String, Vec<ProviderHolding>> = HashMap::new();
            for h in &sync_result.holdings {
                map.entry(h.account_external_id.clone()).or_default().push(h.clone());
            }
            map
        };

        for (external_id, account) in &by_external_id {
            if error_guarded.contains(external_id) {
                let joined = sync_result
                    .errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; ");
                self.accounts
                    .update_sync_status(&account.id, SyncStatus::Error, Some(joined.clone()), None, None)
                    .await?;
                errored += 1;
                messages.push(joined);
                continue;
            }
            if !responded.contains(external_id) {
                self.accounts
                    .update_sync_status(
                        &account.id,
                        SyncStatus::Skipped,
                        Some("account not returned by provider".to_string()),
                        Some(Utc::now().naive_utc()),
                        None,
                    )
                    .await?;
                continue;
            }

            let balance_date = sync_result.balance_dates.get(external_id).copied();
            match self
                .sync_account(account, session, balance_date, holdings_by_account.get(external_id).cloned().unwrap_or_default())
                .await
            {
                Ok(SyncStatus::Stale) => stale += 1,
                Ok(SyncStatus::Success) => synced += 1,
                Ok(_) => {}
                Err(e) => {
                    errored += 1;
                    messages.push(e.to_string());
                }
            }
        }

        // i. activity merge (best-effort)
        if let Err(e) = self.merge_activities(&provider_name, &by_external_id, &sync_result).await {
            warn!("activity merge failed for provider '{provider_name}': {e}");
        }

        // j. lot reconciliation per account that synced successfully this pass
        for account in by_external_id.values() {
            if let Err(e) = self.lots.reconcile_account(&account.id, session).await {
                warn!("lot reconciliation failed for account '{}': {e}", account.id);
            }
        }

        let status = if errored == 0 {
            ProviderLogStatus::Success
        } else if synced > 0 || stale > 0 {
            ProviderLogStatus::Partial
        } else {
            ProviderLogStatus::Failed
        };
        self.sessions
            .create_log_entry(SyncLogEntry {
                id: Uuid::new_v4().to_string(),
                sync_session_id: session.id.clone(),
                provider_name,
                status,
                accounts_synced: synced,
                accounts_stale: stale,
                accounts_error: errored,
                error_message: if messages.is_empty() { None } else { Some(messages.join("; ")) },
            })
            .await?;

        Ok(synced > 0 || stale > 0)
    }

    /// Per-account sync (§4.1.1): staleness gate, duplicate-symbol
    /// consolidation, snapshot + holdings write, valuation for today.
    async fn sync_account(
        &self,
        account: &Account,
        session: &SyncSession,
        balance_date: Option<NaiveDateTime>,
        holdings: Vec<ProviderHolding>,
    ) -> Result<SyncStatus> {
        if let (Some(new_balance), Some(prev_balance)) = (balance_date, account.balance_date) {
            if new_balance.date() <= prev_balance {
                self.accounts
                    .update_sync_status(&account.id, SyncStatus::Stale, None, Some(Utc::now().naive_utc()), None)
                    .await?;
                return Ok(SyncStatus::Stale);
            }
        }

        let write_result = self.write_account_snapshot(account, session, holdings).await;
        match write_result {
            Ok(()) => {
                self.accounts
                    .update_sync_status(
                        &account.id,
                        SyncStatus::Success,
                        None,
                        Some(Utc::now().naive_utc()),
                        balance_date.map(|d| d.date()),
                    )
                    .await?;
                Ok(SyncStatus::Success)
            }
            Err(e) => {
                self.accounts
                    .update_sync_status(&account.id, SyncStatus::Failed, Some(e.to_string()), None, None)
                    .await?;
                let _ = self
                    .snapshots
                    .create_snapshot(
                        NewAccountSnapshot {
                            account_id: account.id.clone(),
                            sync_session_id: session.id.clone(),
                            session_timestamp: session.timestamp,
                            status: SnapshotStatus::Failed,
                            total_value: Decimal::ZERO,
                            balance_date: None,
                        },
                        vec![],
                    )
                    .await;
                Err(e)
            }
        }
    }

    async fn write_account_snapshot(
        &self,
        account: &Account,
        session: &SyncSession,
        holdings: Vec<ProviderHolding>,
    ) -> Result<()> {
        let consolidated = consolidate_duplicate_symbols(holdings);
        let total_value: Decimal = consolidated.iter().map(|h| h.market_value).sum();

        let mut new_holdings = Vec::with_capacity(consolidated.len());
        for h in &consolidated {
            let security = match self.securities.get_by_ticker(&h.symbol)? {
                Some(s) => s,
                None => {
                    self.securities
                        .create(NewSecurity {
                            id: None,
                            ticker: h.symbol.clone(),
                            name: h.name.clone(),
                            currency: h.currency.clone(),
                            manual_asset_class_id: None,
                        })
                        .await?
                }
            };
            new_holdings.push(NewHolding {
                security_id: security.id,
                ticker: h.symbol.clone(),
                quantity: h.quantity,
                snapshot_price: h.price,
                snapshot_value: h.market_value,
                provider_cost_basis: h.cost_basis,
            });
        }

        let snapshot = self
            .snapshots
            .create_snapshot(
                NewAccountSnapshot {
                    account_id: account.id.clone(),
                    sync_session_id: session.id.clone(),
                    session_timestamp: session.timestamp,
                    status: SnapshotStatus::Success,
                    total_value,
                    balance_date: None,
                },
                new_holdings,
            )
            .await?;

        let today = utc_to_local_date(Utc::now().naive_utc());
        if snapshot.total_value != Decimal::ZERO || !consolidated.is_empty() {
            self.valuation.write_daily_values_for_holdings(&snapshot, today).await?;
            self.valuation.delete_zero_balance_sentinel(&account.id, today).await?;
        } else {
            self.valuation.write_zero_balance_sentinel(&account.id, &snapshot, today).await?;
        }
        Ok(())
    }

    async fn merge_activities(
        &self,
        provider_name: &str,
        by_external_id: &HashMap<String, Account>,
        sync_result: &ProviderSyncResult,
    ) -> Result<()> {
        let mut to_create = Vec::new();
        for pa in &sync_result.activities {
            let Some(account) = by_external_id.get(&pa.account_external_id) else {
                continue;
            };
            let activity_type = match pa.activity_type.parse::<ActivityType>() {
                Ok(t) => t,
                Err(_) => {
                    warn!("provider '{provider_name}' reported unknown activity type '{}'", pa.activity_type);
                    continue;
                }
            };
            let security_id = if let Some(ticker) = &pa.ticker {
                Some(
                    match self.securities.get_by_ticker(ticker)? {
                        Some(s) => s.id,
                        None => {
                            self.securities
                                .create(NewSecurity {
                                    id: None,
                                    ticker: ticker.clone(),
                                    name: None,
                                    currency: pa.currency.clone(),
                                    manual_asset_class_id: None,
                                })
                                .await?
                                .id
                        }
                    },
                )
            } else {
                None
            };
            to_create.push(NewActivity {
                id: None,
                account_id: account.id.clone(),
                security_id,
                activity_type,
                activity_date: pa.activity_date.date(),
                quantity: pa.units,
                unit_price: pa.price,
                amount: pa.amount,
                currency: pa.currency.clone(),
            });
        }
        if !to_create.is_empty() {
            self.activities.create_many(to_create).await?;
        }
        Ok(())
    }
}

/// Merges multiple provider holdings for the same symbol (§4.1.1): sums
/// quantity and market value, recomputes price, keeps the first row's
/// currency/name.
fn consolidate_duplicate_symbols(holdings: Vec<ProviderHolding>) -> Vec<ProviderHolding> {
    let mut by_symbol: HashMap<String, ProviderHolding> = HashMap::new();
    for h in holdings {
        by_symbol
            .entry(h.symbol.clone())
            .and_modify(|existing| {
                existing.quantity += h.quantity;
                existing.market_value += h.market_value;
                existing.price = if existing.quantity.is_zero() {
                    Decimal::ZERO
                } else {
                    existing.market_value / existing.quantity
                };
            })
            .or_insert(h);
    }
    by_symbol.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn holding(symbol: &str, qty: Decimal, value: Decimal) -> ProviderHolding {
        ProviderHolding {
            account_external_id: "a1".to_string(),
            symbol: symbol.to_string(),
            quantity: qty,
            price: if qty.is_zero() { Decimal::ZERO } else { value / qty },
            market_value: value,
            currency: "USD".to_string(),
            name: None,
            cost_basis: None,
        }
    }

    #[test]
    fn consolidates_duplicate_symbols() {
        let merged = consolidate_duplicate_symbols(vec![
            holding("USD", dec!(100), dec!(100)),
            holding("USD", dec!(50), dec!(50)),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].quantity, dec!(150));
        assert_eq!(merged[0].market_value, dec!(150));
        assert_eq!(merged[0].price, dec!(1));
    }
}
