//! API request handlers

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::error;
use tracing::info;

use crate::api::types::ApiResponse;
use crate::api::types::AskRequest;
use crate::api::types::AskResponse;
use crate::api::types::HealthResponse;
use crate::rag::RagService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub rag_service: Arc<RagService>,
}

/// Health check handler
pub async fn health() -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

/// Run one question through the pipeline (POST /api/ask)
///
/// Blank questions are rejected with 400 here; the library itself passes them through.
pub async fn ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> (StatusCode, Json<ApiResponse<AskResponse>>) {
    if req.question.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("question must not be empty")),
        );
    }

    info!("POST /api/ask: {}", req.question);

    match state.rag_service.ask(&req.question).await {
        Ok(response) => (StatusCode::OK, Json(ApiResponse::success(response.into()))),
        Err(e) => {
            error!("Error processing question: {}", e);
            let status = if e.is_backend_failure() {
                StatusCode::BAD_GATEWAY
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, Json(ApiResponse::error(e.to_string())))
        }
    }
}
