use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use userinsight_shared::shutdown_signal;
use userinsight_users::{router, AppState, FileUserRepository, HttpEnrichmentClient, UsersConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = UsersConfig::from_env();
    tracing::info!(?config, "loaded users configuration");

    let repo = match FileUserRepository::open(&config.data_dir).await {
        Ok(repo) => repo,
        Err(e) => {
            tracing::error!(
                data_dir = %config.data_dir.display(),
                error = %e,
                "failed to open user store"
            );
            std::process::exit(1);
        }
    };

    let enrichment = match HttpEnrichmentClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "failed to build enrichment client");
            std::process::exit(1);
        }
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = router(AppState::new(Arc::new(repo), Arc::new(enrichment)));

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };
    tracing::info!(%addr, enrichment = %config.enrichment_base_url, "users service listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}
