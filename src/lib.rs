//! # randevu-api
//!
//! Multi-tenant appointment booking backend for service companies.
//!
//! Users book appointments against a company's service catalog. The
//! booking engine runs every appointment write inside a single database
//! transaction: referential checks, the per-user overlap check, and the
//! booking-time price snapshots either commit together or not at all.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── BookingService, CatalogService (service/)
//!     │
//!     ├── AppointmentRepo, CatalogRepo (persistence/)
//!     │
//!     └── PostgreSQL (sqlx)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
