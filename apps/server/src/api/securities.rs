//! `PATCH /api/securities/{id}` — assign or clear a security's asset class
//! (spec.md §6).

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::patch;
use axum::{Json, Router};

use aggregator_core::assets::Security;

use crate::error::ApiResult;
use crate::main_lib::AppState;

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetAssetClassBody {
    asset_class_id: Option<String>,
}

async fn set_asset_class(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<SetAssetClassBody>,
) -> ApiResult<Json<Security>> {
    let updated = state.security_service.set_asset_class(&id, body.asset_class_id).await?;
    Ok(Json(updated))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/securities/{id}", patch(set_asset_class))
}
