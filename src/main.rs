use std::sync::Arc;

use shelf_over::{
    api::{create_router, AppState},
    config::Config,
    db::{create_redis_client, MemoryStore, ReadingStore, RedisStore, StoreWriterHandle},
    services::{catalog_source, Library, ThemeVisuals},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("shelf_over=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let catalog = catalog_source(&config.catalog_source);
    tracing::info!(source = catalog.name(), location = %config.catalog_source, "Loading catalog");
    let books = catalog.load().await?;

    let (store, writer): (Arc<dyn ReadingStore>, Option<StoreWriterHandle>) =
        match &config.redis_url {
            Some(url) => {
                let client = create_redis_client(url)?;
                let (store, handle) = RedisStore::new(client, config.storage_key.clone()).await?;
                (Arc::new(store) as Arc<dyn ReadingStore>, Some(handle))
            }
            None => (Arc::new(MemoryStore::new()) as Arc<dyn ReadingStore>, None),
        };

    let states = store.load_all().await?;
    tracing::info!(store = store.name(), entries = states.len(), "Reading state loaded");

    let library = Library::from_catalog(books, states);
    let state = AppState::new(library, store, ThemeVisuals::default());
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %config.bind_address(), "Server running");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(writer) = writer {
        writer.shutdown().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
