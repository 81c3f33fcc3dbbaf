//! Appointment booking engine.
//!
//! Enforces booking invariants and persists appointments transactionally.
//! Every mutation runs inside a single short-lived transaction spanning the
//! referential checks, the overlap check, and all writes; the schema's
//! exclusion constraint backstops the overlap check under concurrency.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Appointment, AppointmentStatus, ServiceLine, ServiceRequest};
use crate::error::{ApiError, Entity};
use crate::persistence::models::{AppointmentFilter, AppointmentRow, ServiceLineRow, ServiceRow};
use crate::persistence::{AppointmentRepo, CatalogRepo};

/// Input for booking a new appointment.
#[derive(Debug, Clone)]
pub struct NewBooking {
    /// Booking user.
    pub user_id: Uuid,
    /// Company offering the services.
    pub company_id: i64,
    /// Start of the requested window (inclusive).
    pub start_time: DateTime<Utc>,
    /// End of the requested window (exclusive).
    pub end_time: DateTime<Utc>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Requested services. Must be non-empty.
    pub services: Vec<ServiceRequest>,
}

/// Partial update for an existing appointment.
///
/// `services`, when present, replaces the full service-line set with fresh
/// price snapshots. Absent fields keep their current values.
#[derive(Debug, Clone, Default)]
pub struct BookingPatch {
    /// New start time.
    pub start_time: Option<DateTime<Utc>>,
    /// New end time.
    pub end_time: Option<DateTime<Utc>>,
    /// New status. Restricted to legal state-machine transitions.
    pub status: Option<AppointmentStatus>,
    /// Notes patch: `None` keeps the existing text, `Some(None)` clears
    /// it, `Some(Some(text))` replaces it.
    pub notes: Option<Option<String>>,
    /// Full replacement list of services.
    pub services: Option<Vec<ServiceRequest>>,
}

/// Orchestrates all appointment operations against the database.
#[derive(Debug, Clone)]
pub struct BookingService {
    pool: PgPool,
}

impl BookingService {
    /// Creates a new booking service over the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Books a new appointment.
    ///
    /// Preconditions are checked in order, each failing fast: user exists,
    /// company exists, no overlapping non-cancelled appointment for the
    /// user, every requested service exists/belongs to the company/is
    /// active, and the request carries at least one service. The user row
    /// is locked for the duration of the transaction so concurrent bookings
    /// for the same user serialize.
    ///
    /// Price snapshots are taken from the catalog price at booking time;
    /// callers cannot supply prices.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`], [`ApiError::TimeOverlap`],
    /// [`ApiError::NoServices`], [`ApiError::InvalidTimeOrder`], or a
    /// classified constraint/storage error. Any failure rolls the whole
    /// transaction back.
    pub async fn create(&self, req: NewBooking) -> Result<Appointment, ApiError> {
        let mut tx = self.pool.begin().await?;

        let user = CatalogRepo::lock_user(&mut tx, req.user_id)
            .await?
            .ok_or(ApiError::NotFound(Entity::User))?;

        CatalogRepo::find_company(&mut tx, req.company_id)
            .await?
            .ok_or(ApiError::NotFound(Entity::Company))?;

        let overlap =
            AppointmentRepo::has_overlap(&mut tx, user.id, req.start_time, req.end_time, None)
                .await?;
        if overlap {
            return Err(ApiError::TimeOverlap);
        }

        let validated = validate_services(&mut tx, req.company_id, &req.services).await?;

        let id = Uuid::new_v4();
        let row = AppointmentRepo::insert(
            &mut tx,
            id,
            req.user_id,
            req.company_id,
            req.start_time,
            req.end_time,
            req.notes.as_deref(),
        )
        .await?;

        for (service, quantity) in &validated {
            AppointmentRepo::insert_line(&mut tx, id, service.id, *quantity, service.price)
                .await?;
        }

        let lines = AppointmentRepo::lines_for(&mut tx, &[id]).await?;
        tx.commit().await?;

        tracing::info!(appointment_id = %id, user_id = %req.user_id, "appointment booked");
        Ok(assemble(row, lines))
    }

    /// Applies a partial update to an appointment.
    ///
    /// If either time field changes, the overlap check re-runs excluding
    /// this appointment. A status change must be a legal transition. A
    /// `services` list replaces all existing lines after re-validation,
    /// with price snapshots taken at replacement time.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the appointment does not exist,
    /// plus everything [`Self::create`] can return for the re-validated
    /// parts.
    pub async fn update(&self, id: Uuid, patch: BookingPatch) -> Result<Appointment, ApiError> {
        let mut tx = self.pool.begin().await?;

        let existing = AppointmentRepo::find_by_id_for_update(&mut tx, id)
            .await?
            .ok_or(ApiError::NotFound(Entity::Appointment))?;

        let new_start = patch.start_time.unwrap_or(existing.start_time);
        let new_end = patch.end_time.unwrap_or(existing.end_time);
        let time_changed =
            new_start != existing.start_time || new_end != existing.end_time;

        if time_changed {
            let overlap = AppointmentRepo::has_overlap(
                &mut tx,
                existing.user_id,
                new_start,
                new_end,
                Some(id),
            )
            .await?;
            if overlap {
                return Err(ApiError::TimeOverlap);
            }
        }

        let new_status = match patch.status {
            Some(next) => {
                existing.status.validate_transition(next)?;
                next
            }
            None => existing.status,
        };
        let new_notes = patch.notes.unwrap_or(existing.notes);

        if let Some(requests) = &patch.services {
            AppointmentRepo::delete_lines(&mut tx, id).await?;
            let validated = validate_services(&mut tx, existing.company_id, requests).await?;
            for (service, quantity) in &validated {
                AppointmentRepo::insert_line(&mut tx, id, service.id, *quantity, service.price)
                    .await?;
            }
        }

        let row =
            AppointmentRepo::update_row(&mut tx, id, new_start, new_end, new_status, new_notes.as_deref())
                .await?
                .ok_or(ApiError::NotFound(Entity::Appointment))?;

        let lines = AppointmentRepo::lines_for(&mut tx, &[id]).await?;
        tx.commit().await?;

        tracing::info!(appointment_id = %id, "appointment updated");
        Ok(assemble(row, lines))
    }

    /// Cancels a scheduled appointment.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::AlreadyCompleted`] or
    /// [`ApiError::AlreadyCancelled`] for terminal statuses, or
    /// [`ApiError::NotFound`] when the appointment does not exist.
    pub async fn cancel(&self, id: Uuid) -> Result<Appointment, ApiError> {
        let mut tx = self.pool.begin().await?;

        let existing = AppointmentRepo::find_by_id_for_update(&mut tx, id)
            .await?
            .ok_or(ApiError::NotFound(Entity::Appointment))?;

        existing.status.ensure_cancellable()?;

        let row = AppointmentRepo::set_status(&mut tx, id, AppointmentStatus::Cancelled)
            .await?
            .ok_or(ApiError::NotFound(Entity::Appointment))?;

        let lines = AppointmentRepo::lines_for(&mut tx, &[id]).await?;
        tx.commit().await?;

        tracing::info!(appointment_id = %id, "appointment cancelled");
        Ok(assemble(row, lines))
    }

    /// Hard-deletes an appointment regardless of status; its service lines
    /// cascade away in the same statement.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the appointment does not exist.
    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let mut conn = self.pool.acquire().await?;

        let deleted = AppointmentRepo::delete(&mut conn, id).await?;
        if !deleted {
            return Err(ApiError::NotFound(Entity::Appointment));
        }

        tracing::info!(appointment_id = %id, "appointment deleted");
        Ok(())
    }

    /// Fetches one appointment with its service lines.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the appointment does not exist.
    pub async fn get(&self, id: Uuid) -> Result<Appointment, ApiError> {
        let mut conn = self.pool.acquire().await?;

        let row = AppointmentRepo::find_by_id(&mut conn, id)
            .await?
            .ok_or(ApiError::NotFound(Entity::Appointment))?;
        let lines = AppointmentRepo::lines_for(&mut conn, &[id]).await?;

        Ok(assemble(row, lines))
    }

    /// Lists appointments matching the filter, with expanded service lines.
    ///
    /// # Errors
    ///
    /// Returns a storage error on database failure.
    pub async fn list(&self, filter: AppointmentFilter) -> Result<Vec<Appointment>, ApiError> {
        let mut conn = self.pool.acquire().await?;

        let rows = AppointmentRepo::list(&mut conn, &filter).await?;
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let lines = AppointmentRepo::lines_for(&mut conn, &ids).await?;

        Ok(assemble_all(rows, lines))
    }
}

/// Validates each requested service against the catalog in request order,
/// failing on the first invalid entry, then rejects an empty set.
///
/// Returns the catalog rows so the caller snapshots current prices.
async fn validate_services(
    conn: &mut sqlx::PgConnection,
    company_id: i64,
    requests: &[ServiceRequest],
) -> Result<Vec<(ServiceRow, i32)>, ApiError> {
    let mut validated = Vec::with_capacity(requests.len());
    for request in requests {
        request.validate()?;
        let service = CatalogRepo::find_active_service(conn, request.service_id, company_id)
            .await?
            .ok_or(ApiError::NotFound(Entity::Service))?;
        validated.push((service, request.quantity));
    }
    if validated.is_empty() {
        return Err(ApiError::NoServices);
    }
    Ok(validated)
}

/// Builds the appointment aggregate from its row and line rows.
fn assemble(row: AppointmentRow, lines: Vec<ServiceLineRow>) -> Appointment {
    Appointment {
        id: row.id,
        user_id: row.user_id,
        company_id: row.company_id,
        start_time: row.start_time,
        end_time: row.end_time,
        status: row.status,
        notes: row.notes,
        created_at: row.created_at,
        updated_at: row.updated_at,
        services: lines.into_iter().map(to_service_line).collect(),
    }
}

/// Groups line rows by appointment and assembles the aggregates, keeping
/// the row order of `rows`.
fn assemble_all(rows: Vec<AppointmentRow>, lines: Vec<ServiceLineRow>) -> Vec<Appointment> {
    let mut by_appointment: HashMap<Uuid, Vec<ServiceLineRow>> = HashMap::new();
    for line in lines {
        by_appointment
            .entry(line.appointment_id)
            .or_default()
            .push(line);
    }
    rows.into_iter()
        .map(|row| {
            let lines = by_appointment.remove(&row.id).unwrap_or_default();
            assemble(row, lines)
        })
        .collect()
}

fn to_service_line(row: ServiceLineRow) -> ServiceLine {
    ServiceLine {
        service_id: row.service_id,
        service_name: row.service_name,
        quantity: row.quantity,
        price_at_booking: row.price_at_booking,
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn row(id: Uuid) -> AppointmentRow {
        let now = Utc::now();
        AppointmentRow {
            id,
            user_id: Uuid::new_v4(),
            company_id: 1,
            start_time: now,
            end_time: now + chrono::Duration::hours(1),
            status: AppointmentStatus::Scheduled,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn line(appointment_id: Uuid, service_id: i64, quantity: i32) -> ServiceLineRow {
        ServiceLineRow {
            appointment_id,
            service_id,
            service_name: format!("service-{service_id}"),
            quantity,
            price_at_booking: Decimal::new(2500, 2),
        }
    }

    #[test]
    fn assemble_attaches_lines() {
        let id = Uuid::new_v4();
        let appointment = assemble(row(id), vec![line(id, 3, 2), line(id, 9, 1)]);
        assert_eq!(appointment.services.len(), 2);
        assert_eq!(appointment.services[0].service_id, 3);
        assert_eq!(appointment.services[0].quantity, 2);
        assert_eq!(appointment.services[0].price_at_booking, Decimal::new(2500, 2));
    }

    #[test]
    fn assemble_all_groups_lines_by_appointment() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let rows = vec![row(a), row(b)];
        let lines = vec![line(b, 5, 1), line(a, 3, 2), line(a, 4, 1)];

        let appointments = assemble_all(rows, lines);
        assert_eq!(appointments.len(), 2);
        assert_eq!(appointments[0].id, a);
        assert_eq!(appointments[0].services.len(), 2);
        assert_eq!(appointments[1].id, b);
        assert_eq!(appointments[1].services.len(), 1);
    }

    #[test]
    fn assemble_all_tolerates_missing_lines() {
        // Defends the read path; the write path never creates such a row.
        let a = Uuid::new_v4();
        let appointments = assemble_all(vec![row(a)], vec![]);
        assert_eq!(appointments.len(), 1);
        assert!(appointments[0].services.is_empty());
    }
}
