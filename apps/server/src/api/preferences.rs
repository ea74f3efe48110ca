//! `/api/preferences/{key:path}` — arbitrary-JSON settings store (spec.md §6,
//! SPEC_FULL.md §C.8). Keys are validated by
//! [`aggregator_core::settings::validate_key`] inside the service layer.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;

use aggregator_core::settings::{Preference, SettingsServiceTrait};

use crate::error::ApiResult;
use crate::main_lib::AppState;

async fn get_preference(
    Path(key): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Option<Preference>>> {
    Ok(Json(state.settings_service.get_preference(&key)?))
}

async fn put_preference(
    Path(key): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(value): Json<Value>,
) -> ApiResult<Json<Preference>> {
    Ok(Json(state.settings_service.set_preference(&key, value).await?))
}

async fn delete_preference(
    Path(key): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<()> {
    state.settings_service.delete_preference(&key).await?;
    Ok(())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/preferences/{*key}",
        get(get_preference).put(put_preference).delete(delete_preference),
    )
}
