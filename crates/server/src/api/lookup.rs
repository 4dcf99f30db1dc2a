//! Lookup API handler.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use oalens_core::{ItemOutcome, PageItem};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LookupRequest {
    pub items: Vec<PageItem>,
}

#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub outcomes: Vec<ItemOutcome>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// POST /api/v1/lookup
///
/// Run a page of items through the pipeline and return per-item outcomes.
pub async fn lookup(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LookupRequest>,
) -> Result<Json<LookupResponse>, impl IntoResponse> {
    info!(items = request.items.len(), "Lookup request");

    match state.pipeline().process_page(&request.items).await {
        Ok(outcomes) => Ok(Json(LookupResponse { outcomes })),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}
