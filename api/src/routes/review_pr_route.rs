use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::Response,
};
use pr_reviewer::{
    git_providers::{ProviderConfig, PullRequestId},
    publish::PublishConfig,
    run_review,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::core::{app_state::AppState, http::response_envelope::ApiResponse};

#[derive(Deserialize)]
pub struct ReviewPrRequest {
    /// "owner/name" of the repository.
    pub repo: String,
    pub pr_number: u64,
    pub secret: String,
}

#[derive(Serialize)]
pub struct ReviewPrResponse {
    pub message: String,
    pub files: usize,
    pub inline: usize,
    pub skipped: usize,
    pub rollups: usize,
}

/// HTTP endpoint for triggering a PR review.
///
/// Expects a JSON payload with `repo`, `pr_number` and `secret`. If the
/// secret matches the configured `trigger_secret`, the pipeline fetches the
/// PR diff, runs the agent roster and posts comments back via the API.
#[instrument(name = "review_pr_route", skip(state, body), fields(repo = %body.repo))]
pub async fn review_pr(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ReviewPrRequest>,
) -> Response {
    // --- Validate shared secret -------------------------------------------------
    let expected_secret = state.trigger_secret.trim();
    let provided_secret = body.secret.trim();

    if expected_secret.is_empty() {
        // Misconfiguration on server side.
        return ApiResponse::<()>::error(
            "SERVER_CONFIG_ERROR",
            "Trigger secret is not configured.",
        )
        .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR);
    }

    if provided_secret.is_empty() || provided_secret != expected_secret {
        return ApiResponse::<()>::error("UNAUTHORIZED", "Invalid trigger secret.")
            .into_response_with_status(StatusCode::UNAUTHORIZED);
    }

    // --- Build configs ----------------------------------------------------------
    let provider_cfg = ProviderConfig {
        base_api: state.github_api_base.clone(),
        token: state.github_token.clone(),
    };

    let id = PullRequestId {
        repo: body.repo,
        number: body.pr_number,
    };

    info!(repo = %id.repo, number = id.number, "starting PR review trigger");

    // --- Run review pipeline ----------------------------------------------------
    let result = run_review(provider_cfg, id, state.llm.clone(), PublishConfig::from_env()).await;

    match result {
        Ok(outcome) => ApiResponse::success(ReviewPrResponse {
            message: "PR review completed successfully.".to_string(),
            files: outcome.files,
            inline: outcome.report.inline,
            skipped: outcome.report.skipped,
            rollups: outcome.report.rollups,
        })
        .into_response_with_status(StatusCode::OK),
        Err(err) => {
            let resp: ApiResponse<()> = ApiResponse::error("REVIEW_FAILED", format!("{}", err));

            resp.into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
