mod handlers;
mod routes;

use std::sync::Arc;

use arbiter_core::config::JudgeConfig;
use arbiter_core::progress::ProgressStore;
use tokio::net::TcpListener;
use tracing::info;

pub struct AppState {
    pub store: ProgressStore,
    pub config: JudgeConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Arbiter server booting...");

    let config = JudgeConfig::from_env();
    info!(
        submissions_dir = %config.submissions_dir.display(),
        tests_dir = %config.tests_dir.display(),
        timeout_ms = config.timeout.as_millis() as u64,
        memory_limit_mb = config.memory_limit_mb,
        "Configuration loaded"
    );

    let addr = config.listen_addr.clone();
    let state = Arc::new(AppState {
        store: ProgressStore::new(),
        config,
    });

    let app = routes::routes().with_state(state);

    let listener = TcpListener::bind(&addr).await?;
    info!("HTTP server listening on {}", addr);
    info!("Ready to accept submissions");

    axum::serve(listener, app).await?;
    Ok(())
}
