use std::sync::Arc;
use backend::{
    config::{AppConfig, StoreKind},
    registry::ConnectionRegistry,
    service::VoteService,
    store::{MemoryStore, SqliteStore, TallyStore},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[rocket::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🚀 Starting live poll server");

    let figment = rocket::Config::figment();
    let config = AppConfig::from_figment(&figment)?;

    let store: Arc<dyn TallyStore> = match config.store {
        StoreKind::Sqlite => {
            info!("Using SQLite store at {}", config.database_url);
            Arc::new(SqliteStore::connect(&config.database_url, config.max_connections).await?)
        }
        StoreKind::Memory => {
            warn!("Using in-memory store - tallies are lost on restart");
            Arc::new(MemoryStore::new())
        }
    };
    store.seed(&config.seed_options).await?;

    let registry = Arc::new(ConnectionRegistry::new(
        config.broadcast_timeout(),
        config.channel_capacity,
    ));
    let service = VoteService::new(store, registry);

    backend::app(rocket::custom(figment), service).launch().await?;
    Ok(())
}
