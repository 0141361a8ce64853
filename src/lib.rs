pub mod api;
pub mod config;
pub mod model;
pub mod store;

// Export API types
pub use api::routes;

// Export all model types
pub use model::*;

// Export store types
pub use store::{MemoryStore, PostgresStore, Store};

use anyhow::Context;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::config::{AppConfig, ServerConfig};

/// Build the application router around an already connected store
pub fn build_app<S: Store + 'static>(store: Arc<S>, server: &ServerConfig) -> Router {
    let router = crate::api::routes::create_router::<S>();
    let router = match &server.static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };
    router.with_state(store)
}

/// Serve the API on an already bound listener until ctrl-c
pub async fn serve<S: Store + 'static>(
    listener: TcpListener,
    store: Arc<S>,
    server: &ServerConfig,
) -> anyhow::Result<()> {
    let app = build_app(store, server);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}

/// Connect the configured store, bind the listener and serve
pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    log::info!("Brew journal server running on http://{}", bind_address);
    log::info!("API documentation available at http://{}/ui", bind_address);

    if config.database.in_memory {
        log::warn!("Using in-memory store; data is lost on shutdown");
        return serve(listener, Arc::new(MemoryStore::new()), &config.server).await;
    }

    log::info!("Connecting to PostgreSQL...");
    let database_url = config.database_url()?;
    let postgres_store = PostgresStore::new(&database_url, config.max_connections()).await?;

    if config.database.run_migrations {
        log::info!("Running database migrations...");
        postgres_store.migrate().await?;
    }

    serve(listener, Arc::new(postgres_store), &config.server).await
}
