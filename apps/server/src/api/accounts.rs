//! `/api/accounts` — list, per-account holdings, activities, deactivation
//! (spec.md §6).

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::NaiveDate;

use aggregator_core::accounts::{Account, AccountServiceTrait, DeactivateAccountRequest};
use aggregator_core::activities::{Activity, ActivityType, NewActivity};
use aggregator_core::portfolio::lots::summarize_lots;
use aggregator_core::portfolio::snapshot::{NewAccountSnapshot, SnapshotStatus};

use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;
use crate::models::{ActivityQuery, HoldingView, PaginatedActivities};

async fn list_accounts(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Account>>> {
    Ok(Json(state.account_service.get_all_accounts()?))
}

async fn get_holdings(
    Path(account_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<HoldingView>>> {
    let Some(snapshot) = state.snapshots.latest_success_snapshot(&account_id)? else {
        return Ok(Json(Vec::new()));
    };
    let holdings = state.snapshots.get_holdings(&snapshot.id)?;
    let valuation_date = snapshot
        .balance_date
        .unwrap_or_else(|| snapshot.session_timestamp.date());
    let dhv_rows = state
        .dhv
        .rows_for_account_range(&account_id, valuation_date, valuation_date)?;
    let price_by_security: std::collections::HashMap<String, rust_decimal::Decimal> = dhv_rows
        .iter()
        .map(|r| (r.security_id.clone(), r.close_price))
        .collect();
    let market_value_by_security: std::collections::HashMap<String, rust_decimal::Decimal> =
        dhv_rows
            .iter()
            .map(|r| (r.security_id.clone(), r.market_value))
            .collect();

    let lots = state.lots.list_lots_for_account(&account_id)?;
    let disposals = state.lots.list_disposals_for_account(&account_id)?;
    let summaries = summarize_lots(&lots, &disposals, &market_value_by_security);
    let summary_by_security: std::collections::HashMap<String, _> = summaries
        .into_iter()
        .map(|s| (s.security_id.clone(), s))
        .collect();

    let views = holdings
        .into_iter()
        .map(|h| {
            let price = price_by_security
                .get(&h.security_id)
                .copied()
                .unwrap_or(h.snapshot_price);
            let market_value = market_value_by_security
                .get(&h.security_id)
                .copied()
                .unwrap_or(h.snapshot_value);
            HoldingView {
                security_id: h.security_id.clone(),
                ticker: h.ticker,
                quantity: h.quantity,
                price,
                market_value,
                lot_summary: summary_by_security.get(&h.security_id).cloned(),
            }
        })
        .collect();
    Ok(Json(views))
}

async fn list_activities(
    Path(account_id): Path<String>,
    Query(q): Query<ActivityQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<PaginatedActivities>> {
    let from = q
        .date_from
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(1970, 1, 1).unwrap());
    let to = q.date_to.unwrap_or_else(|| chrono::Utc::now().date_naive());
    let mut activities = state.activities.list_for_account(&account_id, from, to)?;
    if let Some(type_filter) = &q.activity_type {
        let wanted: ActivityType = type_filter
            .parse()
            .map_err(|_| ApiError::BadRequest(format!("unknown activity type '{type_filter}'")))?;
        activities.retain(|a| a.activity_type == wanted);
    }
    let total = activities.len();
    let page = q.page.max(1);
    let page_size = q.page_size.max(1);
    let start = (page - 1) * page_size;
    let page_items: Vec<Activity> = activities.into_iter().skip(start).take(page_size).collect();
    Ok(Json(PaginatedActivities {
        activities: page_items,
        total,
        page,
        page_size,
    }))
}

async fn create_activity(
    Path(account_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(mut new_activity): Json<NewActivity>,
) -> ApiResult<Json<Activity>> {
    new_activity.account_id = account_id;
    let created = state.activities.create(new_activity).await?;
    Ok(Json(created))
}

async fn delete_activity(
    Path((_account_id, activity_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<()> {
    state.activities.delete(&activity_id)?;
    Ok(())
}

async fn deactivate_account(
    Path(account_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeactivateAccountRequest>,
) -> ApiResult<Json<Account>> {
    let account = state
        .account_service
        .deactivate_account(&account_id, req.superseded_by_account_id)
        .await?;

    if req.create_closing_snapshot {
        let today = chrono::Utc::now().date_naive();
        state
            .snapshots
            .create_snapshot(
                NewAccountSnapshot {
                    account_id: account_id.clone(),
                    sync_session_id: "manual-deactivation".to_string(),
                    session_timestamp: chrono::Utc::now().naive_utc(),
                    status: SnapshotStatus::Success,
                    total_value: rust_decimal::Decimal::ZERO,
                    balance_date: Some(today),
                },
                Vec::new(),
            )
            .await?;
    }

    Ok(Json(account))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/accounts", get(list_accounts))
        .route("/accounts/{id}/holdings", get(get_holdings))
        .route(
            "/accounts/{id}/activities",
            get(list_activities).post(create_activity),
        )
        .route(
            "/accounts/{id}/activities/{activity_id}",
            delete(delete_activity),
        )
        .route("/accounts/{id}/deactivate", post(deactivate_account))
}
