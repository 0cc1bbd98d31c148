use tracing_subscriber::EnvFilter;

use portfolio_chatbot::api;
use portfolio_chatbot::config::Config;
use portfolio_chatbot::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real env vars still apply
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!("LLM provider: {} ({})", config.llm.provider, config.llm.base_url);
    tracing::info!(
        "Embedding provider: {} ({})",
        config.embedding.provider,
        config.embedding.model
    );
    tracing::info!("Vector store directory: {}", config.index.vector_dir.display());

    let state = AppState::new(config.clone())?;

    // Build the pipeline in the background so `/` answers immediately.
    // Failures are logged by the slot and retried on the next chat request.
    let slot = state.pipeline.clone();
    tokio::spawn(async move {
        slot.get_or_init().await;
    });

    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("Server is running on port {}", config.port);

    axum::serve(listener, app).await?;
    Ok(())
}
