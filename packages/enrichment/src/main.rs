use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;
use userinsight_enrichment::{router, AppState, Enricher, EnrichmentConfig};
use userinsight_shared::shutdown_signal;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = EnrichmentConfig::from_env();
    tracing::info!(?config, "loaded enrichment configuration");

    let enricher = match Enricher::from_config(&config) {
        Ok(enricher) => enricher,
        Err(e) => {
            tracing::error!(error = %e, "failed to initialise provider");
            std::process::exit(1);
        }
    };
    tracing::info!(
        provider = enricher.provider().name(),
        mock = config.mock_mode,
        "enrichment provider selected"
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = router(AppState::new(enricher, config));

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };
    tracing::info!(%addr, "enrichment service listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}
