use devportal_sandbox::config::{AppConfig, StoreBackend};
use devportal_sandbox::store::{MemoryStore, PostgresStore, Store};
use devportal_sandbox::{seed, serve};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Initialize logging with explicit filter to suppress sqlx debug logs
    use env_logger::{Builder, Env};
    use log::LevelFilter;

    Builder::from_env(Env::default().default_filter_or("info"))
        .filter_module("sqlx", LevelFilter::Warn)
        .init();

    // Load configuration
    let config = AppConfig::load()?;
    log::info!(
        "Configuration loaded: server={}:{}, backend={:?}",
        config.server.host,
        config.server.port,
        config.database.backend
    );

    match config.database.backend {
        StoreBackend::Postgres => {
            log::info!("Connecting to PostgreSQL...");
            let database_url = config.database_url()?;
            let postgres_store = PostgresStore::new(&database_url, config.max_connections()).await?;

            log::info!("Running database migrations...");
            postgres_store.migrate().await?;

            run(Arc::new(postgres_store), &config).await
        }
        StoreBackend::Memory => {
            log::info!("Using in-memory example store");
            run(Arc::new(MemoryStore::new()), &config).await
        }
    }
}

async fn run<S: Store + 'static>(store: Arc<S>, config: &AppConfig) -> anyhow::Result<()> {
    // Load seed data for demonstration (optional)
    if std::env::var("LOAD_SEED_DATA").unwrap_or_default() == "true" {
        log::info!("Loading seed data...");
        let seeded = seed::load_seed_data(&*store).await?;
        log::info!("Seed data loaded: {:?}", seeded);
    }

    serve(store, config).await
}
