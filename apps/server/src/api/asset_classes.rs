//! `/api/asset-types` — asset class CRUD plus the holdings tagged with one
//! (spec.md §6, SPEC_FULL.md §C.7).

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use aggregator_core::assets::{AssetClass, NewAssetClass, Security};

use crate::error::ApiResult;
use crate::main_lib::AppState;

async fn list_asset_classes(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<AssetClass>>> {
    Ok(Json(state.asset_class_service.list()?))
}

async fn create_asset_class(
    State(state): State<Arc<AppState>>,
    Json(new_class): Json<NewAssetClass>,
) -> ApiResult<Json<AssetClass>> {
    Ok(Json(state.asset_class_service.create(new_class).await?))
}

#[derive(serde::Deserialize)]
struct RenameBody {
    name: String,
}

async fn update_asset_class(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<RenameBody>,
) -> ApiResult<Json<AssetClass>> {
    Ok(Json(state.asset_class_service.update(&id, body.name).await?))
}

async fn delete_asset_class(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<()> {
    state.asset_class_service.delete(&id).await?;
    Ok(())
}

async fn holdings_for_asset_class(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Security>>> {
    let securities = state.security_service.list()?;
    Ok(Json(
        securities
            .into_iter()
            .filter(|s| s.manual_asset_class_id.as_deref() == Some(id.as_str()))
            .collect(),
    ))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/asset-types",
            get(list_asset_classes).post(create_asset_class),
        )
        .route(
            "/asset-types/{id}",
            axum::routing::put(update_asset_class).delete(delete_asset_class),
        )
        .route("/asset-types/{id}/holdings", get(holdings_for_asset_class))
}
