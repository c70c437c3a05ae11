use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use btc_dashboard_backend::config::Config;
use btc_dashboard_backend::routes::build_router;
use btc_dashboard_backend::services::features::Dataset;
use btc_dashboard_backend::services::loader::load_ticks_from_path;
use btc_dashboard_backend::services::stopwords::StopwordSet;
use btc_dashboard_backend::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,btc_dashboard_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    // A dataset that fails to load is fatal; there is nothing to serve.
    tracing::info!(path = %config.dataset_path.display(), "Loading dataset...");
    let path = config.dataset_path.clone();
    let ticks = tokio::task::spawn_blocking(move || load_ticks_from_path(path))
        .await?
        .with_context(|| format!("Failed to load {}", config.dataset_path.display()))?;
    let dataset = Dataset::from_ticks(&ticks, config.rolling_window);
    drop(ticks);

    let stopwords = StopwordSet::load(config.stopwords_url.as_deref()).await;
    tracing::info!(
        source = stopwords.source(),
        words = stopwords.len(),
        "Stopwords ready"
    );

    let state = AppState::new(dataset, stopwords, &config);
    let app = build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server");
}
