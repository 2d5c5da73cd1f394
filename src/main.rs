use std::sync::Arc;

use resort_booking::config::AppConfig;
use resort_booking::store::{DataStore, InMemoryStore, PgStore};
use resort_booking::{create_router, db, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Resort Booking API - Starting...");

    let config = AppConfig::from_env()?;

    let store: Arc<dyn DataStore> = match &config.database_url {
        Some(database_url) => {
            tracing::info!("Connecting to database...");
            let pool = db::create_pool(database_url, config.database_max_connections).await?;
            db::run_migrations(&pool).await?;
            Arc::new(PgStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL is not set; using the in-memory store, data will not survive a restart");
            Arc::new(InMemoryStore::new())
        }
    };

    let app = create_router(AppState::with_store(store, &config));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Resort Booking API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
