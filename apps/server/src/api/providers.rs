//! `/api/providers` — provider enable/disable registry (spec.md §6,
//! SPEC_FULL.md §C.9).

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use aggregator_core::accounts::{ProviderRegistration, ProviderRegistryTrait};

use crate::error::ApiResult;
use crate::main_lib::AppState;

async fn list_providers(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<ProviderRegistration>>> {
    Ok(Json(state.provider_registry.list()?))
}

#[derive(serde::Deserialize)]
struct SetEnabledBody {
    is_enabled: bool,
}

async fn set_provider_enabled(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<SetEnabledBody>,
) -> ApiResult<Json<ProviderRegistration>> {
    Ok(Json(
        state
            .provider_registry
            .set_enabled(&name, body.is_enabled)
            .await?,
    ))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/providers",
        get(list_providers),
    ).route("/providers/{name}", axum::routing::put(set_provider_enabled))
}
