#![allow(clippy::result_large_err)]

use bwadmin::{
    api::{self, AppState},
    config::{
        self, ApiTokens, StorageBackend,
        coupons::seed_coupons,
        database::{create_connection, create_tables, get_database_url},
    },
    core::CouponEngine,
    errors::Result,
    store::{CouponStore, MemoryCouponStore, SeaOrmCouponStore},
};
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

async fn open_store(backend: StorageBackend) -> Result<Arc<dyn CouponStore>> {
    match backend {
        StorageBackend::Memory => {
            info!("Using in-memory coupon store; coupons are lost on restart");
            Ok(Arc::new(MemoryCouponStore::new()))
        }
        StorageBackend::Sqlite => {
            let db = create_connection(&get_database_url()).await?;
            create_tables(&db).await?;
            info!("Using SQLite coupon store");
            Ok(Arc::new(SeaOrmCouponStore::new(db)))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also be set externally
    dotenv().ok();

    // 3. Load the application configuration
    let app_config = config::load_app_configuration()?;

    // 4. Open the store and build the engine
    let store = open_store(app_config.storage.backend)
        .await
        .inspect_err(|e| error!("Failed to open coupon store: {}", e))?;
    let engine = Arc::new(CouponEngine::new(store));

    // 5. Seed configured coupons
    seed_coupons(&engine, &app_config.coupons)
        .await
        .inspect_err(|e| error!("Failed to seed coupons: {}", e))?;

    // 6. Serve the API
    let tokens = ApiTokens::from_env();
    if tokens.is_empty() {
        warn!("No API tokens configured; every coupon route will answer 401/403");
    }
    let app = api::router(AppState::new(engine, tokens), &app_config.server.cors_origin)?;

    let listener = tokio::net::TcpListener::bind(&app_config.server.bind_address)
        .await
        .inspect_err(|e| error!("Failed to bind {}: {}", app_config.server.bind_address, e))?;
    info!("BWAdmin server listening on {}", app_config.server.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
