//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::service::{BookingService, CatalogService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Booking engine for all appointment operations.
    pub booking: Arc<BookingService>,
    /// Catalog service for users, companies, and services.
    pub catalog: Arc<CatalogService>,
    /// Database handle for the health probe.
    pub pool: PgPool,
}
