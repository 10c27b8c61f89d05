pub mod api;
pub mod config;
pub mod error;
pub mod logic;
pub mod model;
pub mod seed;
pub mod store;

use std::sync::Arc;

use crate::config::{AppConfig, StoreBackend};
use crate::store::{MemoryStore, PostgresStore, Store};

// Export API types
pub use api::handlers;
pub use api::routes;

pub use error::CatalogError;
pub use logic::{BookInstanceValidator, FieldError};

// Export all model types
pub use model::*;

// Export store types
pub use store::{BookInstanceStore, BookStore};

/// Connect the configured store and serve the catalog until the listener fails
pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    match config.store.backend {
        StoreBackend::Postgres => {
            log::info!("Connecting to PostgreSQL...");
            let database_url = config.database_url()?;
            let postgres_store =
                PostgresStore::new(&database_url, config.max_connections()).await?;

            log::info!("Running database migrations...");
            postgres_store.migrate().await?;

            serve_store(Arc::new(postgres_store), &config).await
        }
        StoreBackend::Memory => {
            log::warn!("Using in-memory store; data will not survive a restart");
            serve_store(Arc::new(MemoryStore::new()), &config).await
        }
    }
}

async fn serve_store<S: Store + 'static>(store: Arc<S>, config: &AppConfig) -> anyhow::Result<()> {
    // Load seed data for demonstration (optional)
    if std::env::var("LOAD_SEED_DATA").unwrap_or_default() == "true" {
        log::info!("Loading seed data...");
        seed::load_seed_data(&*store).await?;
    }

    let app = routes::create_router::<S>().with_state(store);

    let bind_address = config.server_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    log::info!("Catalog server running on http://{}/catalog", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
