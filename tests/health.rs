//! Database-backed test for the health probe.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sqlx::PgPool;

use randevu_api::api::handlers::system::health_handler;
use randevu_api::app_state::AppState;
use randevu_api::service::{BookingService, CatalogService};

#[sqlx::test(migrations = "./migrations")]
async fn health_reports_reachable_database(pool: PgPool) {
    let state = AppState {
        booking: Arc::new(BookingService::new(pool.clone())),
        catalog: Arc::new(CatalogService::new(pool.clone())),
        pool,
    };

    let response = health_handler(State(state)).await.into_response();
    assert_eq!(response.status(), StatusCode::OK);
}
