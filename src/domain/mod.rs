//! Domain layer: appointment aggregate, status state machine, and booking
//! request types.

pub mod appointment;

pub use appointment::{Appointment, AppointmentStatus, ServiceLine, ServiceRequest};
