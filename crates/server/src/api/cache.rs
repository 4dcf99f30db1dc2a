//! Cache administration handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use tracing::info;

use oalens_core::CacheStats;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub cleared: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// DELETE /api/v1/cache
///
/// Drop every entry from both cache namespaces.
pub async fn clear_cache(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ClearResponse>, impl IntoResponse> {
    match state.cache().clear_all().await {
        Ok(cleared) => {
            info!(cleared, "Cache cleared");
            Ok(Json(ClearResponse { cleared }))
        }
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}

/// GET /api/v1/cache/stats
///
/// Entry counts per namespace and freshness.
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CacheStats>, impl IntoResponse> {
    match state.cache().stats().await {
        Ok(stats) => Ok(Json(stats)),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}
