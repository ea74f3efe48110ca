//! HTTP routes (spec.md §6): one module per resource, merged here under
//! `/api` with the ambient middleware stack (tracing, CORS, timeouts,
//! request ids) applied once at the top.

mod accounts;
mod asset_classes;
mod preferences;
mod providers;
mod returns;
mod securities;
mod sync;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::main_lib::AppState;

pub fn app_router(state: Arc<AppState>, _config: &Config) -> Router {
    let api_routes = Router::new()
        .merge(accounts::router())
        .merge(asset_classes::router())
        .merge(preferences::router())
        .merge(providers::router())
        .merge(returns::router())
        .merge(securities::router())
        .merge(sync::router())
        .with_state(state);

    Router::new().nest("/api", api_routes).layer(
        tower::ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TimeoutLayer::new(Duration::from_secs(30)))
            .layer(CorsLayer::permissive()),
    )
}
