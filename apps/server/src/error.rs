//! HTTP error mapping (SPEC_FULL.md §B.2, spec.md §7): collapses
//! `aggregator_core::Error` into a status code plus a sanitized message. The
//! full error chain is logged server-side; only a terse message crosses the
//! wire.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use aggregator_core::errors::{Error as CoreError, ReconciliationError, SyncError};

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("sync already in progress")]
    SyncInProgress,

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::SyncInProgress => (
                StatusCode::CONFLICT,
                "a sync is already in progress".to_string(),
            ),
            ApiError::Core(CoreError::Sync(SyncError::SyncInProgress(_))) => (
                StatusCode::CONFLICT,
                "a sync is already in progress".to_string(),
            ),
            ApiError::Core(CoreError::Sync(SyncError::AuthError { provider, .. })) => (
                StatusCode::BAD_GATEWAY,
                format!("authentication with '{provider}' failed"),
            ),
            ApiError::Core(CoreError::Sync(SyncError::ConnectionError { provider, .. })) => (
                StatusCode::BAD_GATEWAY,
                format!("could not reach provider '{provider}'"),
            ),
            ApiError::Core(CoreError::Database(db_err)) => {
                let msg = db_err.to_string();
                if msg.contains("not found") || msg.to_lowercase().contains("not found") {
                    (StatusCode::NOT_FOUND, msg)
                } else {
                    (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
                }
            }
            ApiError::Core(CoreError::Validation(_)) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            ApiError::Core(CoreError::Reconciliation(ReconciliationError::LotNotFound {
                ..
            })) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Core(_) => {
                tracing::error!("unhandled core error: {self}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
            ApiError::Other(err) => {
                tracing::error!("unhandled error: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
