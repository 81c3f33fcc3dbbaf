//! Appointment DTOs for booking, update, and list operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::common_dto::PageMeta;
use crate::domain::{Appointment, AppointmentStatus, ServiceRequest};
use crate::error::ApiError;
use crate::persistence::models::AppointmentFilter;
use crate::service::{BookingPatch, NewBooking};

/// Maximum length of the free-text notes field.
const MAX_NOTES_LEN: usize = 500;

/// Request body for `POST /appointments`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAppointmentRequest {
    /// Booking user.
    pub user_id: Uuid,
    /// Company offering the services.
    pub company_id: i64,
    /// Start of the requested window (inclusive, RFC 3339).
    pub start_time: DateTime<Utc>,
    /// End of the requested window (exclusive, RFC 3339).
    pub end_time: DateTime<Utc>,
    /// Free-text notes, at most 500 characters.
    #[serde(default)]
    pub notes: Option<String>,
    /// Requested services. Must be non-empty; prices are snapshotted from
    /// the catalog, never supplied by the caller.
    pub services: Vec<ServiceRequest>,
}

impl CreateAppointmentRequest {
    /// Converts into the engine input after request-local validation.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] when `notes` exceeds 500
    /// characters.
    pub fn into_booking(self) -> Result<NewBooking, ApiError> {
        validate_notes(self.notes.as_deref())?;
        Ok(NewBooking {
            user_id: self.user_id,
            company_id: self.company_id,
            start_time: self.start_time,
            end_time: self.end_time,
            notes: self.notes,
            services: self.services,
        })
    }
}

/// Request body for `PATCH /appointments/{id}`. All fields optional.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateAppointmentRequest {
    /// New start time.
    pub start_time: Option<DateTime<Utc>>,
    /// New end time.
    pub end_time: Option<DateTime<Utc>>,
    /// New status; must be a legal state-machine transition.
    pub status: Option<AppointmentStatus>,
    /// New notes text, at most 500 characters. An explicit `null` clears
    /// the notes; omitting the field keeps them.
    #[serde(default, deserialize_with = "deserialize_explicit_null")]
    pub notes: Option<Option<String>>,
    /// Full replacement list of services.
    pub services: Option<Vec<ServiceRequest>>,
}

impl UpdateAppointmentRequest {
    /// Converts into the engine patch after request-local validation.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] when `notes` exceeds 500
    /// characters.
    pub fn into_patch(self) -> Result<BookingPatch, ApiError> {
        validate_notes(self.notes.as_ref().and_then(|n| n.as_deref()))?;
        Ok(BookingPatch {
            start_time: self.start_time,
            end_time: self.end_time,
            status: self.status,
            notes: self.notes,
            services: self.services,
        })
    }
}

/// Query parameters for `GET /appointments`.
#[derive(Debug, Default, Deserialize)]
pub struct ListAppointmentsQuery {
    /// Only appointments of this user.
    pub user_id: Option<Uuid>,
    /// Only appointments at this company.
    pub company_id: Option<i64>,
    /// Only appointments starting at or after this instant.
    pub start_from: Option<DateTime<Utc>>,
    /// Only appointments ending at or before this instant.
    pub end_until: Option<DateTime<Utc>>,
    /// Only appointments with this status.
    pub status: Option<AppointmentStatus>,
    /// Number of items to skip. Defaults to 0.
    #[serde(default)]
    pub offset: i64,
    /// Maximum number of items to return (max 100). Defaults to 100.
    pub limit: Option<i64>,
}

impl ListAppointmentsQuery {
    /// Converts into the repository filter with pagination clamped.
    #[must_use]
    pub fn into_filter(self) -> AppointmentFilter {
        AppointmentFilter {
            user_id: self.user_id,
            company_id: self.company_id,
            start_from: self.start_from,
            end_until: self.end_until,
            status: self.status,
            offset: self.offset.max(0),
            limit: self
                .limit
                .unwrap_or(super::common_dto::MAX_LIMIT)
                .clamp(1, super::common_dto::MAX_LIMIT),
        }
    }
}

/// Paginated list response for `GET /appointments`.
#[derive(Debug, Serialize, ToSchema)]
pub struct AppointmentListResponse {
    /// Appointments with expanded service lines.
    pub data: Vec<Appointment>,
    /// Pagination metadata.
    pub pagination: PageMeta,
}

/// Distinguishes an explicit JSON `null` (`Some(None)`) from an absent
/// field (`None`, via `#[serde(default)]`).
fn deserialize_explicit_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn validate_notes(notes: Option<&str>) -> Result<(), ApiError> {
    if let Some(text) = notes {
        if text.chars().count() > MAX_NOTES_LEN {
            return Err(ApiError::InvalidRequest(format!(
                "notes must be at most {MAX_NOTES_LEN} characters"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn create_request_parses_with_defaults() {
        let json = r#"{
            "user_id": "123e4567-e89b-12d3-a456-426614174000",
            "company_id": 1,
            "start_time": "2026-09-01T09:00:00Z",
            "end_time": "2026-09-01T10:00:00Z",
            "services": [{ "service_id": 101, "quantity": 2 }, { "service_id": 102 }]
        }"#;
        let parsed: CreateAppointmentRequest = match serde_json::from_str(json) {
            Ok(v) => v,
            Err(e) => panic!("parse failed: {e}"),
        };
        assert!(parsed.notes.is_none());
        assert_eq!(parsed.services.len(), 2);

        let booking = match parsed.into_booking() {
            Ok(v) => v,
            Err(e) => panic!("conversion failed: {e}"),
        };
        assert_eq!(booking.services.len(), 2);
    }

    #[test]
    fn oversized_notes_are_rejected() {
        let request = CreateAppointmentRequest {
            user_id: Uuid::new_v4(),
            company_id: 1,
            start_time: Utc::now(),
            end_time: Utc::now() + chrono::Duration::hours(1),
            notes: Some("x".repeat(MAX_NOTES_LEN + 1)),
            services: vec![],
        };
        assert!(matches!(
            request.into_booking(),
            Err(ApiError::InvalidRequest(_))
        ));
    }

    #[test]
    fn patch_distinguishes_null_notes_from_absent() {
        let absent: UpdateAppointmentRequest = match serde_json::from_str("{}") {
            Ok(v) => v,
            Err(e) => panic!("parse failed: {e}"),
        };
        assert_eq!(absent.notes, None);

        let cleared: UpdateAppointmentRequest =
            match serde_json::from_str(r#"{ "notes": null }"#) {
                Ok(v) => v,
                Err(e) => panic!("parse failed: {e}"),
            };
        assert_eq!(cleared.notes, Some(None));

        let replaced: UpdateAppointmentRequest =
            match serde_json::from_str(r#"{ "notes": "rescheduled twice" }"#) {
                Ok(v) => v,
                Err(e) => panic!("parse failed: {e}"),
            };
        assert_eq!(replaced.notes, Some(Some("rescheduled twice".to_string())));
    }

    #[test]
    fn oversized_patch_notes_are_rejected() {
        let request = UpdateAppointmentRequest {
            notes: Some(Some("x".repeat(MAX_NOTES_LEN + 1))),
            ..UpdateAppointmentRequest::default()
        };
        assert!(matches!(
            request.into_patch(),
            Err(ApiError::InvalidRequest(_))
        ));
    }

    #[test]
    fn list_query_clamps_pagination() {
        let query = ListAppointmentsQuery {
            offset: -1,
            limit: Some(100_000),
            ..ListAppointmentsQuery::default()
        };
        let filter = query.into_filter();
        assert_eq!(filter.offset, 0);
        assert_eq!(filter.limit, 100);
    }

    #[test]
    fn list_query_defaults_limit() {
        let filter = ListAppointmentsQuery::default().into_filter();
        assert_eq!(filter.limit, 100);
        assert!(filter.status.is_none());
    }

    #[test]
    fn status_filter_parses_lowercase() {
        let query: ListAppointmentsQuery =
            match serde_json::from_str(r#"{ "status": "cancelled" }"#) {
                Ok(v) => v,
                Err(e) => panic!("parse failed: {e}"),
            };
        assert_eq!(query.status, Some(AppointmentStatus::Cancelled));
    }
}
