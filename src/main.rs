use std::sync::Arc;
use anyhow::Context;
use taskboard::{
    app::{self, AppState},
    config::{Config, StoreBackend},
    services::{seed_accounts, MemoryStore, RedisStore, TaskStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::load().context("Failed to load configuration")?;

    let store: Arc<dyn TaskStore> = match config.store.backend {
        StoreBackend::Redis => {
            let client = redis::Client::open(config.redis.url.as_str())
                .context("Invalid Redis URL")?;
            let store = RedisStore::connect(client)
                .await
                .context("Failed to connect to Redis")?;
            Arc::new(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, data is lost on shutdown");
            Arc::new(MemoryStore::new())
        }
    };

    seed_accounts(store.as_ref(), &config.seed)
        .await
        .context("Failed to seed default accounts")?;

    let address = format!("{}:{}", config.server.host, config.server.port);
    let app = app::router(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!("Server running on http://{}", address);

    axum::serve(listener, app.into_make_service())
        .await
        .context("Failed to start server")?;
    Ok(())
}
