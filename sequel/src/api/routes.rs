use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::openapi;
use super::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/chat", post(handlers::chat::chat))
        .route("/chat_history", get(handlers::chat::chat_history))
        .route("/graph_data", get(handlers::graph::graph_data))
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(openapi::openapi_json))
        .merge(openapi::redoc_router());

    let debug = Router::new().route("/api_test", get(handlers::debug::api_test));

    Router::new()
        .nest("/api", api)
        .nest("/debug", debug)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
