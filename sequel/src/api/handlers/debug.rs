//! Diagnostics for the completion service connection.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::api::AppState;
use crate::llm::ProbeReport;

/// `GET /debug/api_test`
#[utoipa::path(
    get,
    path = "/debug/api_test",
    tag = "debug",
    responses(
        (status = 200, description = "Result of a single un-retried completion", body = ProbeReport),
        (status = 400, description = "No API key configured"),
    )
)]
pub async fn api_test(State(state): State<AppState>) -> Response {
    match state.completion.probe().await {
        Some(report) => {
            tracing::info!(status = %report.status, model = %report.model, "Completion probe finished");
            Json(report).into_response()
        }
        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "No API key set",
                "instructions": "Set OPENROUTER_API_KEY in .env file",
            })),
        )
            .into_response(),
    }
}
