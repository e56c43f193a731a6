use axum::extract::State;
use axum::Json;

use crate::api::dto::GraphDataResponse;
use crate::api::AppState;
use crate::error::Result;

/// `GET /api/graph_data`
#[utoipa::path(
    get,
    path = "/api/graph_data",
    tag = "graph",
    responses(
        (status = 200, description = "All concept nodes and edges", body = GraphDataResponse),
    )
)]
pub async fn graph_data(State(state): State<AppState>) -> Result<Json<GraphDataResponse>> {
    let snapshot = state.graph.graph_data().await?;
    Ok(Json(snapshot.into()))
}
