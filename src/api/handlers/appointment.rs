//! Appointment handlers: book, list, get, update, cancel, delete.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use crate::api::dto::{
    AppointmentListResponse, CreateAppointmentRequest, ListAppointmentsQuery, PageMeta,
    UpdateAppointmentRequest,
};
use crate::app_state::AppState;
use crate::domain::Appointment;
use crate::error::{ApiError, ErrorResponse};

/// `POST /appointments` — Book a new appointment.
///
/// # Errors
///
/// Returns [`ApiError`] when a referenced entity is missing, the window
/// overlaps an existing appointment, or no services were requested.
#[utoipa::path(
    post,
    path = "/api/v1/appointments",
    tag = "Appointments",
    summary = "Book an appointment",
    description = "Books an appointment for a user against a company's services. The whole booking is transactional: referential checks, the overlap check, and all writes either commit together or not at all. Service prices are snapshotted from the catalog at booking time.",
    request_body = CreateAppointmentRequest,
    responses(
        (status = 201, description = "Appointment booked", body = Appointment),
        (status = 400, description = "Invalid request or no services", body = ErrorResponse),
        (status = 404, description = "User, company, or service not found", body = ErrorResponse),
        (status = 409, description = "Time overlap with an existing appointment", body = ErrorResponse),
    )
)]
pub async fn create_appointment(
    State(state): State<AppState>,
    Json(req): Json<CreateAppointmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let booking = req.into_booking()?;
    let appointment = state.booking.create(booking).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// `GET /appointments` — List appointments with filters and pagination.
///
/// # Errors
///
/// Returns [`ApiError`] on storage failures.
#[utoipa::path(
    get,
    path = "/api/v1/appointments",
    tag = "Appointments",
    summary = "List appointments",
    description = "Returns appointments matching all provided filters (user, company, time range, status), with expanded service lines. Offset/limit pagination, limit capped at 100.",
    responses(
        (status = 200, description = "Matching appointments", body = AppointmentListResponse),
    )
)]
pub async fn list_appointments(
    State(state): State<AppState>,
    Query(query): Query<ListAppointmentsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = query.into_filter();
    let offset = filter.offset;
    let limit = filter.limit;
    let data = state.booking.list(filter).await?;

    let count = data.len();
    Ok(Json(AppointmentListResponse {
        data,
        pagination: PageMeta {
            offset,
            limit,
            count,
        },
    }))
}

/// `GET /appointments/:id` — Get one appointment with its service lines.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the appointment does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/appointments/{id}",
    tag = "Appointments",
    summary = "Get an appointment",
    params(
        ("id" = Uuid, Path, description = "Appointment UUID"),
    ),
    responses(
        (status = 200, description = "Appointment details", body = Appointment),
        (status = 404, description = "Appointment not found", body = ErrorResponse),
    )
)]
pub async fn get_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let appointment = state.booking.get(id).await?;
    Ok(Json(appointment))
}

/// `PATCH /appointments/:id` — Partially update an appointment.
///
/// # Errors
///
/// Returns [`ApiError`] on missing entities, overlap after a time change,
/// an illegal status transition, or an empty replacement service list.
#[utoipa::path(
    patch,
    path = "/api/v1/appointments/{id}",
    tag = "Appointments",
    summary = "Update an appointment",
    description = "Applies a partial update. A time change re-runs the overlap check (excluding this appointment); a services list atomically replaces all service lines with fresh price snapshots; status writes are restricted to legal transitions. Sending notes as an explicit null clears them; omitting the field keeps them.",
    params(
        ("id" = Uuid, Path, description = "Appointment UUID"),
    ),
    request_body = UpdateAppointmentRequest,
    responses(
        (status = 200, description = "Updated appointment", body = Appointment),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Appointment or service not found", body = ErrorResponse),
        (status = 409, description = "Time overlap or illegal status transition", body = ErrorResponse),
    )
)]
pub async fn update_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateAppointmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let patch = req.into_patch()?;
    let appointment = state.booking.update(id, patch).await?;
    Ok(Json(appointment))
}

/// `POST /appointments/:id/cancel` — Cancel a scheduled appointment.
///
/// # Errors
///
/// Returns [`ApiError::AlreadyCompleted`] or [`ApiError::AlreadyCancelled`]
/// for terminal statuses.
#[utoipa::path(
    post,
    path = "/api/v1/appointments/{id}/cancel",
    tag = "Appointments",
    summary = "Cancel an appointment",
    description = "Transitions a scheduled appointment to cancelled. Completed and already-cancelled appointments are rejected.",
    params(
        ("id" = Uuid, Path, description = "Appointment UUID"),
    ),
    responses(
        (status = 200, description = "Cancelled appointment", body = Appointment),
        (status = 404, description = "Appointment not found", body = ErrorResponse),
        (status = 409, description = "Appointment already completed or cancelled", body = ErrorResponse),
    )
)]
pub async fn cancel_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let appointment = state.booking.cancel(id).await?;
    Ok(Json(appointment))
}

/// `DELETE /appointments/:id` — Hard-delete an appointment.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the appointment does not exist.
#[utoipa::path(
    delete,
    path = "/api/v1/appointments/{id}",
    tag = "Appointments",
    summary = "Delete an appointment",
    description = "Removes an appointment of any status together with its service lines.",
    params(
        ("id" = Uuid, Path, description = "Appointment UUID"),
    ),
    responses(
        (status = 204, description = "Appointment deleted"),
        (status = 404, description = "Appointment not found", body = ErrorResponse),
    )
)]
pub async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.booking.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Appointment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/appointments",
            post(create_appointment).get(list_appointments),
        )
        .route(
            "/appointments/{id}",
            get(get_appointment)
                .patch(update_appointment)
                .delete(delete_appointment),
        )
        .route("/appointments/{id}/cancel", post(cancel_appointment))
}
