use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sequel AI API",
        version = "1.0.0",
        description = "Chat service that grows a concept graph from every conversation turn.",
    ),
    paths(
        handlers::health::health_check,
        handlers::chat::chat,
        handlers::chat::chat_history,
        handlers::graph::graph_data,
        handlers::debug::api_test,
    ),
    components(schemas(
        dto::ChatRequest,
        dto::ChatResponse,
        dto::ChatRecordDto,
        dto::ChatHistoryResponse,
        dto::NodeDto,
        dto::EdgeDto,
        dto::GraphDataResponse,
        crate::llm::ProbeReport,
        handlers::health::HealthData,
        handlers::health::DatabaseStatus,
        handlers::health::CompletionStatus,
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "chat", description = "Chat turns and the conversation log"),
        (name = "graph", description = "Concept graph snapshot"),
        (name = "debug", description = "Completion service diagnostics"),
    ),
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/health",
            "/api/chat",
            "/api/chat_history",
            "/api/graph_data",
            "/debug/api_test",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
