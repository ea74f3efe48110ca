//! `POST /api/sync` — manual sync trigger (spec.md §4.1, §6).

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use aggregator_core::sync::SyncSession;

use crate::error::ApiResult;
use crate::main_lib::AppState;

async fn trigger_sync(State(state): State<Arc<AppState>>) -> ApiResult<Json<SyncSession>> {
    let session = state.orchestrator.trigger_sync().await?;
    Ok(Json(session))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/sync", post(trigger_sync))
}
