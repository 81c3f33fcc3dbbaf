//! Persistence layer: PostgreSQL rows and repositories.
//!
//! Repositories are stateless namespaces over `&mut PgConnection` so the
//! same query can run inside a transaction or on a pooled connection. The
//! services layer owns transaction boundaries; nothing here commits.

pub mod appointment;
pub mod catalog;
pub mod models;

pub use appointment::AppointmentRepo;
pub use catalog::CatalogRepo;
