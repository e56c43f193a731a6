// Shared setup for integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Once};
use std::time::Duration;

use sequel::api::{create_router, AppState};
use sequel::config::{Config, DatabaseConfig, LlmConfig};
use sequel::db::{Database, DatabaseBackend, LibSqlBackend};
use sequel::llm::{CompletionClient, RetryPolicy};
use serde_json::json;
use tempfile::TempDir;

static INIT: Once = Once::new();

/// Initialize tracing subscriber once for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

pub struct TestApp {
    pub addr: SocketAddr,
    pub db: Arc<dyn DatabaseBackend>,
    pub state: AppState,
    _temp_dir: TempDir,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

pub async fn temp_backend(name: &str) -> (Arc<dyn DatabaseBackend>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join(name);
    let config = DatabaseConfig::new(format!("file:{}", db_path.to_str().unwrap()));
    let db = Database::new(&config)
        .await
        .expect("Failed to create database");
    (Arc::new(LibSqlBackend::new(db)), temp_dir)
}

/// LLM settings pointing at a wiremock server, or mock mode when `base_url`
/// is `None`.
pub fn llm_config(base_url: Option<String>) -> LlmConfig {
    match base_url {
        Some(base_url) => LlmConfig {
            api_key: Some("sk-or-v1-test-key-123".to_string()),
            base_url,
            timeout_secs: 5,
            ..LlmConfig::default()
        },
        None => LlmConfig::default(),
    }
}

/// Retry policy with millisecond backoffs.
pub fn fast_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy::new(max_attempts)
        .with_backoffs(Duration::from_millis(10), Duration::from_millis(10))
}

pub async fn spawn_app(llm: LlmConfig, seed: bool) -> TestApp {
    init_test_logger();

    let (db, temp_dir) = temp_backend("sequel_test.db").await;

    let mut config = Config::default();
    config.llm = llm;
    config.graph.seed_sample_graph = seed;

    let completion = CompletionClient::new(&config.llm)
        .expect("Failed to create completion client")
        .with_retry_policy(fast_policy(config.llm.max_retries));

    let state = AppState::new(&config, db.clone(), completion);
    if seed {
        state
            .graph
            .seed_sample_graph()
            .await
            .expect("Failed to seed sample graph");
    }

    let app = create_router(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        db,
        state,
        _temp_dir: temp_dir,
    }
}

pub fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1,
        "model": "google/gemini-test",
        "choices": [
            {
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": content
                },
                "finish_reason": "stop"
            }
        ],
        "usage": {
            "prompt_tokens": 1,
            "completion_tokens": 1,
            "total_tokens": 2
        }
    })
}

pub fn api_error_body(message: &str, code: u16) -> serde_json::Value {
    json!({
        "error": {
            "message": message,
            "code": code
        }
    })
}
