//! randevu-api server entry point.
//!
//! Starts the Axum HTTP server backed by a PostgreSQL connection pool.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use randevu_api::api;
use randevu_api::app_state::AppState;
use randevu_api::config::AppConfig;
use randevu_api::service::{BookingService, CatalogService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting randevu-api");

    // Connect to PostgreSQL
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect(&config.database_url)
        .await?;

    if config.run_migrations {
        sqlx::migrate!().run(&pool).await?;
        tracing::info!("migrations applied");
    }

    // Build service layer
    let booking = Arc::new(BookingService::new(pool.clone()));
    let catalog = Arc::new(CatalogService::new(pool.clone()));

    // Build application state
    let app_state = AppState {
        booking,
        catalog,
        pool,
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
