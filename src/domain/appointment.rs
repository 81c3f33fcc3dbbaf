//! Appointment aggregate and status state machine.
//!
//! Status transitions only move forward: `scheduled → completed` and
//! `scheduled → cancelled`. Both `completed` and `cancelled` are terminal.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;

/// Lifecycle status of an appointment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "appointment_status", rename_all = "lowercase")]
pub enum AppointmentStatus {
    /// Booked and upcoming.
    Scheduled,
    /// The appointment took place. Terminal.
    Completed,
    /// The appointment was called off. Terminal.
    Cancelled,
}

impl AppointmentStatus {
    /// Whether no further transitions are allowed from this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Scheduled)
    }

    /// Validates a direct status write, e.g. via an update patch.
    ///
    /// Writing the current status back is a no-op and always allowed;
    /// otherwise only forward transitions out of `scheduled` are legal.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::AlreadyCompleted`] or [`ApiError::AlreadyCancelled`]
    /// when attempting to leave a terminal status.
    pub fn validate_transition(self, next: Self) -> Result<(), ApiError> {
        if self == next {
            return Ok(());
        }
        match self {
            Self::Scheduled => Ok(()),
            Self::Completed => Err(ApiError::AlreadyCompleted),
            Self::Cancelled => Err(ApiError::AlreadyCancelled),
        }
    }

    /// Validates the cancel operation. Unlike [`Self::validate_transition`],
    /// cancelling an already-cancelled appointment is an error.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::AlreadyCompleted`] or [`ApiError::AlreadyCancelled`]
    /// for terminal statuses.
    pub fn ensure_cancellable(self) -> Result<(), ApiError> {
        match self {
            Self::Scheduled => Ok(()),
            Self::Completed => Err(ApiError::AlreadyCompleted),
            Self::Cancelled => Err(ApiError::AlreadyCancelled),
        }
    }
}

/// One service booked as part of an appointment, with the price frozen at
/// booking time.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ServiceLine {
    /// Catalog service this line refers to.
    pub service_id: i64,
    /// Service name at read time (joined from the catalog).
    pub service_name: String,
    /// How many units of the service were booked. Always ≥ 1.
    pub quantity: i32,
    /// Catalog price captured when the line was written. Immutable even if
    /// the catalog price later changes.
    pub price_at_booking: Decimal,
}

/// An appointment together with its service lines.
///
/// Only the booking engine creates these; an appointment never exists
/// without at least one service line.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Appointment {
    /// Opaque unique identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Owning company.
    pub company_id: i64,
    /// Start of the booked window (inclusive).
    pub start_time: DateTime<Utc>,
    /// End of the booked window (exclusive).
    pub end_time: DateTime<Utc>,
    /// Lifecycle status.
    pub status: AppointmentStatus,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
    /// Booked services with price snapshots.
    pub services: Vec<ServiceLine>,
}

/// A caller-supplied service entry in a booking or replacement request.
///
/// Carries no price: the engine snapshots the authoritative catalog price
/// at booking time, so clients cannot tamper with it.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct ServiceRequest {
    /// Catalog service to book.
    pub service_id: i64,
    /// Requested quantity. Must be ≥ 1; defaults to 1.
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

const fn default_quantity() -> i32 {
    1
}

impl ServiceRequest {
    /// Validates the entry-local invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] when `quantity < 1`.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.quantity < 1 {
            return Err(ApiError::InvalidRequest(format!(
                "service {}: quantity must be at least 1",
                self.service_id
            )));
        }
        Ok(())
    }
}
