use almanac_scheduler::CronSchedulerManager;
use almanac_server::{AppState, ServerConfig, WorkflowService, router};
use almanac_workflow::{DefinitionResolver, InMemoryRepositoryStore};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = ServerConfig::from_env().expect("failed to load configuration");
    tracing::info!(default_site_id = %config.default_site_id, "Loaded configuration");

    let store = match &config.seed_path {
        Some(path) => {
            InMemoryRepositoryStore::load_seed_file(path).expect("failed to load seed catalog")
        }
        None => {
            tracing::warn!("No seed path configured, starting with an empty catalog");
            InMemoryRepositoryStore::new()
        }
    };

    let service = WorkflowService::new(
        DefinitionResolver::new(Arc::new(store)),
        Arc::new(CronSchedulerManager::new()),
    );
    let app_state = Arc::new(AppState::new(service, config.default_site_id));
    let app = router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .expect("failed to bind to address");

    tracing::info!("listening on http://{}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
