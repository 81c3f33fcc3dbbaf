//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the central error type for the service. Every
//! business-rule violation is mapped to a variant of this taxonomy before
//! it leaves the services layer; unclassified database errors surface as
//! [`ApiError::Storage`]. Each variant maps to a specific HTTP status code
//! and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2101,
///     "message": "appointment time overlaps an existing appointment for this user",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`ApiError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Entity kinds referenced by [`ApiError::NotFound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    /// A booking user.
    User,
    /// A company (tenant).
    Company,
    /// A company service (catalog entry).
    Service,
    /// An appointment.
    Appointment,
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::User => "user",
            Self::Company => "company",
            Self::Service => "service",
            Self::Appointment => "appointment",
        };
        f.write_str(name)
    }
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category         | HTTP Status                |
/// |-----------|------------------|----------------------------|
/// | 1000–1999 | Invalid argument | 400 Bad Request            |
/// | 2000–2099 | Not found        | 404 Not Found              |
/// | 2100–2199 | Conflict         | 409 Conflict               |
/// | 2200–2299 | Invalid state    | 409 Conflict               |
/// | 3000–3999 | Storage/server   | 500 Internal Server Error  |
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A referenced entity does not exist (or is not active where activity
    /// is required).
    #[error("{0} not found")]
    NotFound(Entity),

    /// The requested time range overlaps a non-cancelled appointment of the
    /// same user.
    #[error("appointment time overlaps an existing appointment for this user")]
    TimeOverlap,

    /// The same service was requested more than once for one appointment.
    #[error("duplicate service for this appointment")]
    DuplicateServiceLine,

    /// An appointment was submitted without any services.
    #[error("an appointment requires at least one service")]
    NoServices,

    /// `end_time` is not strictly after `start_time`.
    #[error("appointment end time must be after start time")]
    InvalidTimeOrder,

    /// Request validation failed for any other reason.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A completed appointment cannot be cancelled or reopened.
    #[error("appointment is already completed")]
    AlreadyCompleted,

    /// A cancelled appointment cannot be cancelled again or reopened.
    #[error("appointment is already cancelled")]
    AlreadyCancelled,

    /// Unclassified persistence failure (connection, serialization, or a
    /// constraint this taxonomy does not model).
    #[error("storage error: {0}")]
    Storage(String),
}

impl ApiError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::InvalidTimeOrder => 1002,
            Self::NoServices => 1003,
            Self::NotFound(entity) => match entity {
                Entity::User => 2001,
                Entity::Company => 2002,
                Entity::Service => 2003,
                Entity::Appointment => 2004,
            },
            Self::TimeOverlap => 2101,
            Self::DuplicateServiceLine => 2102,
            Self::AlreadyCompleted => 2201,
            Self::AlreadyCancelled => 2202,
            Self::Storage(_) => 3001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::InvalidTimeOrder | Self::NoServices => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::TimeOverlap
            | Self::DuplicateServiceLine
            | Self::AlreadyCompleted
            | Self::AlreadyCancelled => StatusCode::CONFLICT,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if let Some(mapped) = classify_constraint(db_err.code().as_deref(), db_err.constraint())
            {
                return mapped;
            }
        }
        Self::Storage(err.to_string())
    }
}

/// Maps a Postgres SQLSTATE and constraint name onto the error taxonomy.
///
/// Constraint violations raised by the schema are the storage-layer backstop
/// for the application-level checks, so they must surface as the same
/// taxonomy errors instead of raw storage failures. Returns `None` for
/// anything this taxonomy does not model.
fn classify_constraint(code: Option<&str>, constraint: Option<&str>) -> Option<ApiError> {
    match code? {
        // exclusion_violation: excl_user_time_overlap is the only one.
        "23P01" => Some(ApiError::TimeOverlap),
        // unique_violation
        "23505" => match constraint? {
            "pk_appointment_service" => Some(ApiError::DuplicateServiceLine),
            "uq_company_service_name" => Some(ApiError::InvalidRequest(
                "a service with this name already exists for this company".to_string(),
            )),
            "uq_company_name" | "uq_company_email" => Some(ApiError::InvalidRequest(
                "a company with this name or email already exists".to_string(),
            )),
            "uq_user_email" => Some(ApiError::InvalidRequest(
                "a user with this email already exists".to_string(),
            )),
            _ => None,
        },
        // check_violation
        "23514" => match constraint? {
            "chk_appointment_time_order" => Some(ApiError::InvalidTimeOrder),
            "chk_line_quantity_positive" => Some(ApiError::InvalidRequest(
                "service quantity must be at least 1".to_string(),
            )),
            "chk_service_price_non_negative" => Some(ApiError::InvalidRequest(
                "service price must not be negative".to_string(),
            )),
            "chk_service_duration_positive" => Some(ApiError::InvalidRequest(
                "service duration must be positive".to_string(),
            )),
            _ => None,
        },
        // foreign_key_violation: a referenced row vanished between the
        // application-level check and the write.
        "23503" => {
            let name = constraint?;
            if name.contains("user") {
                Some(ApiError::NotFound(Entity::User))
            } else if name.contains("company_id") {
                Some(ApiError::NotFound(Entity::Company))
            } else if name.contains("service") {
                Some(ApiError::NotFound(Entity::Service))
            } else if name.contains("appointment") {
                Some(ApiError::NotFound(Entity::Appointment))
            } else {
                None
            }
        }
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn exclusion_violation_maps_to_time_overlap() {
        let mapped = classify_constraint(Some("23P01"), Some("excl_user_time_overlap"));
        assert!(matches!(mapped, Some(ApiError::TimeOverlap)));
    }

    #[test]
    fn duplicate_line_pk_maps_to_duplicate_service_line() {
        let mapped = classify_constraint(Some("23505"), Some("pk_appointment_service"));
        assert!(matches!(mapped, Some(ApiError::DuplicateServiceLine)));
    }

    #[test]
    fn time_order_check_maps_to_invalid_time_order() {
        let mapped = classify_constraint(Some("23514"), Some("chk_appointment_time_order"));
        assert!(matches!(mapped, Some(ApiError::InvalidTimeOrder)));
    }

    #[test]
    fn fk_violations_map_to_not_found_by_entity() {
        let user = classify_constraint(Some("23503"), Some("appointments_user_id_fkey"));
        assert!(matches!(user, Some(ApiError::NotFound(Entity::User))));

        let company = classify_constraint(Some("23503"), Some("appointments_company_id_fkey"));
        assert!(matches!(company, Some(ApiError::NotFound(Entity::Company))));

        let service =
            classify_constraint(Some("23503"), Some("appointment_services_service_id_fkey"));
        assert!(matches!(service, Some(ApiError::NotFound(Entity::Service))));
    }

    #[test]
    fn unknown_codes_stay_unclassified() {
        assert!(classify_constraint(Some("40001"), None).is_none());
        assert!(classify_constraint(None, Some("whatever")).is_none());
    }

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(
            ApiError::NotFound(Entity::Appointment).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ApiError::TimeOverlap.status_code(), StatusCode::CONFLICT);
        assert_eq!(ApiError::AlreadyCancelled.status_code(), StatusCode::CONFLICT);
        assert_eq!(ApiError::NoServices.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Storage("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(ApiError::NotFound(Entity::User).error_code(), 2001);
        assert_eq!(ApiError::TimeOverlap.error_code(), 2101);
        assert_eq!(ApiError::AlreadyCompleted.error_code(), 2201);
        assert_eq!(ApiError::Storage(String::new()).error_code(), 3001);
    }
}
