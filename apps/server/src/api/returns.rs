//! `GET /api/returns` — money-weighted returns for the portfolio or a single
//! account (spec.md §4.4, §6).

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};

use aggregator_core::portfolio::returns::ReturnsReport;

use crate::error::ApiResult;
use crate::main_lib::AppState;
use crate::models::ReturnsQuery;

async fn get_returns(
    Query(q): Query<ReturnsQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ReturnsReport>> {
    let periods = q
        .periods
        .map(|csv| csv.split(',').map(|s| s.trim().to_string()).collect());
    let report = state.returns_engine.get_returns(&q.scope, periods)?;
    Ok(Json(report))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/returns", get(get_returns))
}
