//! The lot reconciliation engine (§4.3): reconstructs tax-lot history from
//! the delta between an account's previous and current snapshot.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::activities::{ActivityRepositoryTrait, ActivityType};
use crate::errors::{Error, ReconciliationError, Result};
use crate::portfolio::snapshot::{AccountSnapshot, Holding, SnapshotRepositoryTrait};
use crate::sync::SyncSession;
use crate::utils::time_utils::utc_to_local_date;

use super::lots_model::{DisposalSource, HoldingLot, LotDisposal, LotSource, LotSummary, NewHoldingLot, NewLotDisposal};
use super::lots_traits::LotRepositoryTrait;

/// Folds an account's lots and disposals into one [`LotSummary`] per
/// security, for the holdings API surface (§6). `market_value_by_security`
/// supplies the current value used for unrealized gain/loss; securities with
/// no open quantity are omitted even if they have closed lots, since the
/// summary is about what's currently held plus its realized history.
pub fn summarize_lots(
    lots: &[HoldingLot],
    disposals: &[LotDisposal],
    market_value_by_security: &HashMap<String, Decimal>,
) -> Vec<LotSummary> {
    let mut by_security: HashMap<&str, LotSummary> = HashMap::new();

    for lot in lots {
        let entry = by_security
            .entry(lot.security_id.as_str())
            .or_insert_with(|| LotSummary {
                security_id: lot.security_id.clone(),
                ..Default::default()
            });
        entry.open_quantity += lot.current_quantity;
        entry.cost_basis += lot.current_quantity * lot.cost_basis_per_unit;
        if lot.current_quantity > Decimal::ZERO {
            entry.lot_count += 1;
        }
    }

    let cost_per_unit: HashMap<&str, Decimal> = lots
        .iter()
        .map(|l| (l.id.as_str(), l.cost_basis_per_unit))
        .collect();
    for disposal in disposals {
        let Some(entry) = by_security.get_mut(disposal.security_id.as_str()) else {
            continue;
        };
        let basis = cost_per_unit
            .get(disposal.holding_lot_id.as_str())
            .copied()
            .unwrap_or(Decimal::ZERO);
        entry.realized_gain_loss += (disposal.proceeds_per_unit - basis) * disposal.quantity;
    }

    for summary in by_security.values_mut() {
        if let Some(market_value) = market_value_by_security.get(&summary.security_id) {
            summary.unrealized_gain_loss = *market_value - summary.cost_basis;
        }
    }

    by_security
        .into_values()
        .filter(|s| s.open_quantity > Decimal::ZERO || s.realized_gain_loss != Decimal::ZERO)
        .collect()
}

pub struct LotReconciliationEngine {
    snapshots: Arc<dyn SnapshotRepositoryTrait>,
    activities: Arc<dyn ActivityRepositoryTrait>,
    lots: Arc<dyn LotRepositoryTrait>,
}

impl LotReconciliationEngine {
    pub fn new(
        snapshots: Arc<dyn SnapshotRepositoryTrait>,
        activities: Arc<dyn ActivityRepositoryTrait>,
        lots: Arc<dyn LotRepositoryTrait>,
    ) -> Self {
        Self { snapshots, activities, lots }
    }

    /// Idempotent when rerun on the same inputs: finds the snapshot this
    /// session wrote for `account_id` and the one immediately before it,
    /// then reconciles the delta between them.
    pub async fn reconcile_account(&self, account_id: &str, session: &SyncSession) -> Result<()> {
        let history = self.snapshots.list_success_snapshots(account_id)?;
        let Some(curr_idx) = history.iter().rposition(|s| s.sync_session_id == session.id) else {
            return Ok(());
        };
        let curr = history[curr_idx].clone();
        let prev = history[..curr_idx].last().cloned();

        let curr_holdings = self.snapshots.get_holdings(&curr.id)?;
        self.seed_phase(account_id, prev.as_ref(), &curr_holdings).await?;

        let Some(prev) = prev else {
            return Ok(());
        };
        let prev_holdings = self.snapshots.get_holdings(&prev.id)?;
        self.delta_phase(account_id, &prev, &curr, &prev_holdings, &curr_holdings).await
    }

    /// Phase 1 (§4.3): for every security present in either snapshot, top
    /// up open-lot coverage to the baseline quantity observed in this pass.
    async fn seed_phase(
        &self,
        account_id: &str,
        prev: Option<&AccountSnapshot>,
        curr_holdings: &[Holding],
    ) -> Result<()> {
        let prev_holdings = match prev {
            Some(p) => self.snapshots.get_holdings(&p.id)?,
            None => Vec::new(),
        };
        let pairs: Vec<(String, Option<Holding>, Option<Holding>)> =
            index_by_security(curr_holdings, &prev_holdings)
                .into_iter()
                .map(|(sec, (c, p))| (sec.to_string(), c.cloned(), p.cloned()))
                .collect();

        for (security_id, curr_h, prev_h) in pairs {
            let baseline_qty = match &prev_h {
                Some(h) => h.quantity,
                None => curr_h.as_ref().map(|h| h.quantity).unwrap_or(Decimal::ZERO),
            };
            let reference = curr_h.as_ref().or(prev_h.as_ref());
            self.seed_baseline(account_id, &security_id, reference, baseline_qty).await?;
        }
        Ok(())
    }

    async fn seed_baseline(
        &self,
        account_id: &str,
        security_id: &str,
        reference: Option<&Holding>,
        baseline_qty: Decimal,
    ) -> Result<()> {
        let open_sum = self.lots.open_quantity(account_id, security_id)?;
        if baseline_qty <= open_sum {
            return Ok(());
        }
        let Some(reference) = reference else { return Ok(()) };
        let shortfall = baseline_qty - open_sum;
        self.lots
            .create_lot(NewHoldingLot {
                account_id: account_id.to_string(),
                security_id: security_id.to_string(),
                ticker: reference.ticker.clone(),
                acquisition_date: None,
                cost_basis_per_unit: reference.provider_cost_basis.unwrap_or(reference.snapshot_price),
                original_quantity: shortfall,
                current_quantity: shortfall,
                source: LotSource::Initial,
                activity_id: None,
            })
            .await?;
        Ok(())
    }

    /// Phase 2 (§4.3): processes the quantity delta per security, matching
    /// buy activities before falling back to an inferred lot, and disposing
    /// FIFO on a shrink.
    async fn delta_phase(
        &self,
        account_id: &str,
        prev: &AccountSnapshot,
        curr: &AccountSnapshot,
        prev_holdings: &[Holding],
        curr_holdings: &[Holding],
    ) -> Result<()> {
        let pairs: Vec<(String, Option<Holding>, Option<Holding>)> =
            index_by_security(curr_holdings, prev_holdings)
                .into_iter()
                .map(|(sec, (c, p))| (sec.to_string(), c.cloned(), p.cloned()))
                .collect();
        let prev_local = utc_to_local_date(prev.session_timestamp);
        let curr_local = utc_to_local_date(curr.session_timestamp);

        for (security_id, curr_h, prev_h) in pairs {
            let curr_qty = curr_h.as_ref().map(|h| h.quantity).unwrap_or(Decimal::ZERO);
            let prev_qty = prev_h.as_ref().map(|h| h.quantity).unwrap_or(Decimal::ZERO);
            if curr_qty < Decimal::ZERO {
                return Err(Error::Reconciliation(ReconciliationError::NegativeQuantity {
                    account_id: account_id.to_string(),
                    security_id: security_id.clone(),
                    quantity: curr_qty.to_string(),
                }));
            }
            let delta = curr_qty - prev_qty;
            if delta == Decimal::ZERO {
                continue;
            }
            let ticker = curr_h
                .as_ref()
                .or(prev_h.as_ref())
                .map(|h| h.ticker.clone())
                .unwrap_or_default();
            let snapshot_price = curr_h.as_ref().map(|h| h.snapshot_price).unwrap_or(Decimal::ZERO);
            let provider_cost_basis = curr_h.as_ref().and_then(|h| h.provider_cost_basis);

            if delta > Decimal::ZERO {
                self.grow_position(
                    account_id,
                    &security_id,
                    &ticker,
                    delta,
                    prev_local,
                    curr_local,
                    provider_cost_basis,
                    snapshot_price,
                )
                .await?;
            } else {
                self.shrink_position(
                    account_id,
                    &security_id,
                    &ticker,
                    -delta,
                    prev_qty,
                    prev_local,
                    curr_local,
                    snapshot_price,
                )
                .await?;
            }
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    async fn grow_position(
        &self,
        account_id: &str,
        security_id: &str,
        ticker: &str,
        delta: Decimal,
        prev_local: NaiveDate,
        curr_local: NaiveDate,
        provider_cost_basis: Option<Decimal>,
        snapshot_price: Decimal,
    ) -> Result<()> {
        let mut remaining = delta;
        let trades = self.activities.list_trades_for_security(account_id, security_id)?;
        let buys: Vec<_> = trades
            .into_iter()
            .filter(|a| {
                a.activity_type == ActivityType::Buy
                    && a.activity_date > prev_local
                    && a.activity_date <= curr_local
            })
            .collect();

        for activity in buys {
            if remaining <= Decimal::ZERO {
                break;
            }
            let units = activity.quantity.unwrap_or(Decimal::ZERO);
            if units <= Decimal::ZERO {
                continue;
            }
            let consumed = units.min(remaining);
            self.lots
                .create_lot(NewHoldingLot {
                    account_id: account_id.to_string(),
                    security_id: security_id.to_string(),
                    ticker: ticker.to_string(),
                    acquisition_date: Some(activity.activity_date),
                    cost_basis_per_unit: activity.unit_price.unwrap_or(snapshot_price),
                    original_quantity: consumed,
                    current_quantity: consumed,
                    source: LotSource::Activity,
                    activity_id: Some(activity.id.clone()),
                })
                .await?;
            remaining -= consumed;
        }

        if remaining > Decimal::ZERO {
            self.lots
                .create_lot(NewHoldingLot {
                    account_id: account_id.to_string(),
                    security_id: security_id.to_string(),
                    ticker: ticker.to_string(),
                    acquisition_date: None,
                    cost_basis_per_unit: provider_cost_basis.unwrap_or(snapshot_price),
                    original_quantity: remaining,
                    current_quantity: remaining,
                    source: LotSource::Inferred,
                    activity_id: None,
                })
                .await?;
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    async fn shrink_position(
        &self,
        account_id: &str,
        security_id: &str,
        ticker: &str,
        to_dispose: Decimal,
        prev_qty: Decimal,
        prev_local: NaiveDate,
        curr_local: NaiveDate,
        snapshot_price: Decimal,
    ) -> Result<()> {
        let trades = self.activities.list_trades_for_security(account_id, security_id)?;
        let sells: Vec<_> = trades
            .into_iter()
            .filter(|a| {
                a.activity_type == ActivityType::Sell
                    && a.activity_date > prev_local
                    && a.activity_date <= curr_local
            })
            .collect();

        let (proceeds_per_unit, disposal_date, source, activity_id) =
            if to_dispose == prev_qty && sells.len() == 1 {
                let sale = &sells[0];
                (
                    sale.unit_price.unwrap_or(snapshot_price),
                    sale.activity_date,
                    DisposalSource::Activity,
                    Some(sale.id.clone()),
                )
            } else {
                (snapshot_price, curr_local, DisposalSource::Inferred, None)
            };

        let open_sum = self.lots.open_quantity(account_id, security_id)?;
        if open_sum < to_dispose {
            self.lots
                .create_lot(NewHoldingLot {
                    account_id: account_id.to_string(),
                    security_id: security_id.to_string(),
                    ticker: ticker.to_string(),
                    acquisition_date: None,
                    cost_basis_per_unit: snapshot_price,
                    original_quantity: to_dispose - open_sum,
                    current_quantity: to_dispose - open_sum,
                    source: LotSource::Initial,
                    activity_id: None,
                })
                .await?;
        }

        let open_lots = self.lots.open_lots(account_id, security_id)?;
        let disposal_group_id = Uuid::new_v4().to_string();
        let mut remaining = to_dispose;
        for lot in open_lots {
            if remaining <= Decimal::ZERO {
                break;
            }
            let consume = lot.current_quantity.min(remaining);
            if consume <= Decimal::ZERO {
                continue;
            }
            self.lots.apply_disposal(&lot.id, lot.current_quantity - consume).await?;
            self.lots
                .create_disposal(NewLotDisposal {
                    holding_lot_id: lot.id.clone(),
                    account_id: account_id.to_string(),
                    security_id: security_id.to_string(),
                    quantity: consume,
                    proceeds_per_unit,
                    disposal_date,
                    source,
                    activity_id: activity_id.clone(),
                    disposal_group_id: disposal_group_id.clone(),
                })
                .await?;
            remaining -= consume;
        }
        if remaining > Decimal::ZERO {
            return Err(Error::Reconciliation(ReconciliationError::InsufficientLots {
                account_id: account_id.to_string(),
                security_id: security_id.to_string(),
                requested: to_dispose.to_string(),
                available: (to_dispose - remaining).to_string(),
            }));
        }
        Ok(())
    }
}

/// Joins two holding lists on `security_id`, keyed for both phases'
/// "mentioned in either snapshot" iteration.
fn index_by_security<'a>(
    curr: &'a [Holding],
    prev: &'a [Holding],
) -> HashMap<&'a str, (Option<&'a Holding>, Option<&'a Holding>)> {
    let mut map: HashMap<&str, (Option<&Holding>, Option<&Holding>)> = HashMap::new();
    for h in curr {
        map.entry(h.security_id.as_str()).or_insert((None, None)).0 = Some(h);
    }
    for h in prev {
        map.entry(h.security_id.as_str()).or_insert((None, None)).1 = Some(h);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexes_join_on_security_regardless_of_which_side_is_present() {
        let curr = vec![Holding {
            id: "h1".into(),
            account_snapshot_id: "s1".into(),
            security_id: "sec1".into(),
            ticker: "AAPL".into(),
            quantity: Decimal::ONE,
            snapshot_price: Decimal::ONE,
            snapshot_value: Decimal::ONE,
            provider_cost_basis: None,
        }];
        let prev: Vec<Holding> = Vec::new();
        let idx = index_by_security(&curr, &prev);
        assert_eq!(idx.len(), 1);
        assert!(idx["sec1"].0.is_some());
        assert!(idx["sec1"].1.is_none());
    }
}
