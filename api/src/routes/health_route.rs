use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Response};
use llm_service::OllamaService;
use serde::Serialize;
use tracing::debug;

use crate::core::{app_state::AppState, http::response_envelope::ApiResponse};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Whether the Ollama endpoint answered the connectivity probe.
    pub ollama: bool,
}

/// Liveness endpoint: the process is up; `ollama` reports whether the
/// inference server is reachable right now.
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    let ollama = match OllamaService::new(state.llm.clone()) {
        Ok(svc) => svc.check_connection().await,
        Err(e) => {
            debug!(error = %e, "ollama service not constructible");
            false
        }
    };

    ApiResponse::success(HealthResponse {
        status: "ok",
        ollama,
    })
    .into_response_with_status(StatusCode::OK)
}
