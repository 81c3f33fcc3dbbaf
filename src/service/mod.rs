//! Services layer: booking engine and catalog orchestration.
//!
//! Each operation acquires its own scoped connection or transaction from
//! the pool and releases it on every exit path. An early return drops an
//! uncommitted transaction, which rolls it back.

pub mod booking;
pub mod catalog;

pub use booking::{BookingPatch, BookingService, NewBooking};
pub use catalog::CatalogService;
