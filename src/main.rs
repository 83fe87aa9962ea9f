use std::sync::Arc;

use color_eyre::eyre::{Result, eyre};
use dotenv::dotenv;
use scheduling_api::config::{ApiConfig, StoreBackend};
use scheduling_core::store::ScheduleStore;
use scheduling_db::{MemoryStore, PgScheduleStore, create_pool, schema::initialize_database};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;
    scheduling_api::init_tracing(config.log_level)?;

    let store: Arc<dyn ScheduleStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or_else(|| eyre!("DATABASE_URL environment variable must be set"))?;

            // Create database connection pool
            let db_pool = create_pool(database_url, config.database_max_connections).await?;

            // Initialize database schema
            initialize_database(&db_pool).await?;
            info!("Using PostgreSQL store");

            Arc::new(PgScheduleStore::new(db_pool))
        }
        StoreBackend::Memory => {
            warn!("Using in-memory store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    // Start API server
    scheduling_api::start_server(config, store).await?;

    Ok(())
}
