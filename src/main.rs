use std::sync::Arc;

use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sociallab_leads_api::{
    app::{build_router, serve_then_release},
    config::{Config, StoreBackend},
    db::Database,
    db_storage::LeadStorage,
    handlers::AppState,
    store::{LeadStore, MemoryLeadStore},
};

/// Main entry point for the application.
///
/// Initializes tracing, loads configuration, opens the lead store and
/// serves the API until SIGINT/SIGTERM. The database pool is closed after
/// in-flight requests have drained.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sociallab_leads_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Open the lead store
    let (store, database): (Arc<dyn LeadStore>, Option<Database>) = match config.store_backend {
        StoreBackend::Postgres => {
            let db = Database::from_config(&config).await?;
            db.ensure_schema().await?;
            tracing::info!("Database connection pool established");
            let store: Arc<dyn LeadStore> = Arc::new(LeadStorage::new(db.pool.clone()));
            (store, Some(db))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory lead store; leads are lost on restart");
            let store: Arc<dyn LeadStore> = Arc::new(MemoryLeadStore::new());
            (store, None)
        }
    };

    let port = config.port;
    let app_state = Arc::new(AppState { store, config });
    let app = build_router(app_state);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    serve_then_release(listener, app, shutdown_signal(), async move {
        if let Some(db) = database {
            db.close().await;
            tracing::info!("Database connection pool closed");
        }
    })
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received, draining connections");
}
