use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sequel::api::{create_router, AppState};
use sequel::config::Config;
use sequel::db::{Database, DatabaseBackend, LibSqlBackend};
use sequel::llm::CompletionClient;

#[derive(Parser)]
#[command(name = "sequel")]
#[command(about = "Chat service that builds a concept graph from conversations")]
struct Args {
    /// Override SEQUEL_HOST
    #[arg(long)]
    host: Option<String>,

    /// Override SEQUEL_PORT
    #[arg(long)]
    port: Option<u16>,

    /// Skip creating the sample graph on an empty database
    #[arg(long)]
    no_seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sequel=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env();
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.no_seed {
        config.graph.seed_sample_graph = false;
    }

    tracing::info!("Initializing database...");
    let raw_db = Database::new(&config.database).await?;
    let db: Arc<dyn DatabaseBackend> = Arc::new(LibSqlBackend::new(raw_db));

    let completion = CompletionClient::new(&config.llm)?;
    if completion.is_mock() {
        tracing::warn!(
            "OPENROUTER_API_KEY is not set, completions will be mocked. Set it in .env to enable the completion service."
        );
    } else {
        tracing::info!(
            model = %completion.model(),
            max_attempts = config.llm.max_retries,
            "Completion service configured"
        );
    }

    let state = AppState::new(&config, db, completion);

    if config.graph.seed_sample_graph {
        state.graph.seed_sample_graph().await?;
    }

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Sequel starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/api/health", addr);
    tracing::info!("  API docs:     http://{}/api/docs", addr);
    tracing::info!("  OpenAPI spec: http://{}/api/openapi.json", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %error, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!(error = %error, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping server...");
}
