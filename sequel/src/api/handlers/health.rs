use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::AppState;

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub database: DatabaseStatus,
    pub completion: CompletionStatus,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct DatabaseStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes: Option<u64>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct CompletionStatus {
    /// `"live"` with an API key, `"mock"` without.
    pub mode: String,
    pub model: String,
}

/// `GET /api/health`
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health status", body = HealthData),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthData> {
    let database = match state.db.count_nodes().await {
        Ok(nodes) => DatabaseStatus {
            status: "ok".to_string(),
            nodes: Some(nodes),
        },
        Err(error) => {
            tracing::warn!(error = %error, "Health check database query failed");
            DatabaseStatus {
                status: "error".to_string(),
                nodes: None,
            }
        }
    };

    let mode = if state.completion.is_mock() { "mock" } else { "live" };
    let completion = CompletionStatus {
        mode: mode.to_string(),
        model: state.completion.model().to_string(),
    };

    Json(HealthData {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
        completion,
    })
}
