//! LLM Gateway - reliability-hardened async gateway for chat-completion APIs

use llm_gateway::server;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize logging system; LOG_LEVEL controls verbosity
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_target(false)
        .with_thread_ids(false)
        .init();

    server::run_server().await.map_err(|e| e.into())
}
