//! Data Transfer Objects for REST request/response serialization.
//!
//! Prices serialize through `rust_decimal`, so `NUMERIC(10,2)` values never
//! lose precision on the wire.

pub mod appointment_dto;
pub mod catalog_dto;
pub mod common_dto;

pub use appointment_dto::*;
pub use catalog_dto::*;
pub use common_dto::*;
