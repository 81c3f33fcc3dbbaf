//! Repository for the `appointments` and `appointment_services` tables.
//!
//! All writes are meant to run inside a transaction owned by the booking
//! engine; this module never commits or rolls back.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgConnection;
use uuid::Uuid;

use super::models::{AppointmentFilter, AppointmentRow, ServiceLineRow};
use crate::domain::AppointmentStatus;

/// Column list for `appointments` queries.
const COLUMNS: &str =
    "id, user_id, company_id, start_time, end_time, status, notes, created_at, updated_at";

/// Column list for service-line queries (joined with the catalog for the
/// service name).
const LINE_COLUMNS: &str = "l.appointment_id, l.service_id, s.name AS service_name, \
     l.quantity, l.price_at_booking";

/// Stateless query namespace for appointments and their service lines.
#[derive(Debug)]
pub struct AppointmentRepo;

impl AppointmentRepo {
    /// Insert a new appointment row with status `scheduled`.
    ///
    /// The `chk_appointment_time_order` check and `excl_user_time_overlap`
    /// exclusion constraint fire here when violated.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` on database failure or constraint violation.
    pub async fn insert(
        conn: &mut PgConnection,
        id: Uuid,
        user_id: Uuid,
        company_id: i64,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        notes: Option<&str>,
    ) -> Result<AppointmentRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO appointments (id, user_id, company_id, start_time, end_time, notes) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AppointmentRow>(&query)
            .bind(id)
            .bind(user_id)
            .bind(company_id)
            .bind(start_time)
            .bind(end_time)
            .bind(notes)
            .fetch_one(conn)
            .await
    }

    /// Insert one service line with its booking-time price snapshot.
    ///
    /// The `pk_appointment_service` primary key rejects duplicate services
    /// for the same appointment.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` on database failure or constraint violation.
    pub async fn insert_line(
        conn: &mut PgConnection,
        appointment_id: Uuid,
        service_id: i64,
        quantity: i32,
        price_at_booking: Decimal,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO appointment_services (appointment_id, service_id, quantity, price_at_booking) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(appointment_id)
        .bind(service_id)
        .bind(quantity)
        .bind(price_at_booking)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Find an appointment by ID.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` on database failure.
    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<AppointmentRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM appointments WHERE id = $1");
        sqlx::query_as::<_, AppointmentRow>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Find an appointment by ID and lock the row for the rest of the
    /// transaction. Used by update, cancel, and delete so concurrent
    /// mutations of the same appointment serialize.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` on database failure.
    pub async fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<AppointmentRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM appointments WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, AppointmentRow>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Whether a non-cancelled appointment of `user_id` overlaps
    /// `[start_time, end_time)`.
    ///
    /// Overlap test: `existing.start < end AND existing.end > start`, so
    /// back-to-back appointments do not collide. `exclude` skips the
    /// appointment being updated itself.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` on database failure.
    pub async fn has_overlap(
        conn: &mut PgConnection,
        user_id: Uuid,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        exclude: Option<Uuid>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS ( \
                 SELECT 1 FROM appointments \
                 WHERE user_id = $1 \
                   AND status <> 'cancelled' \
                   AND start_time < $3 \
                   AND end_time > $2 \
                   AND ($4::uuid IS NULL OR id <> $4) \
             )",
        )
        .bind(user_id)
        .bind(start_time)
        .bind(end_time)
        .bind(exclude)
        .fetch_one(conn)
        .await
    }

    /// Overwrite the mutable fields of an appointment row.
    ///
    /// The caller passes fully merged values (patch applied over the
    /// existing row). Returns `None` if the row no longer exists.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` on database failure or constraint violation.
    pub async fn update_row(
        conn: &mut PgConnection,
        id: Uuid,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        status: AppointmentStatus,
        notes: Option<&str>,
    ) -> Result<Option<AppointmentRow>, sqlx::Error> {
        let query = format!(
            "UPDATE appointments SET \
                start_time = $2, end_time = $3, status = $4, notes = $5, updated_at = NOW() \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AppointmentRow>(&query)
            .bind(id)
            .bind(start_time)
            .bind(end_time)
            .bind(status)
            .bind(notes)
            .fetch_optional(conn)
            .await
    }

    /// Set only the status of an appointment.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` on database failure.
    pub async fn set_status(
        conn: &mut PgConnection,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Option<AppointmentRow>, sqlx::Error> {
        let query = format!(
            "UPDATE appointments SET status = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AppointmentRow>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(conn)
            .await
    }

    /// Hard-delete an appointment. Service lines go with it via
    /// `ON DELETE CASCADE`. Returns `true` if a row was removed.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` on database failure.
    pub async fn delete(conn: &mut PgConnection, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete all service lines of an appointment, ahead of a full
    /// replacement. Returns the number of removed lines.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` on database failure.
    pub async fn delete_lines(conn: &mut PgConnection, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM appointment_services WHERE appointment_id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }

    /// Load the service lines of the given appointments.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` on database failure.
    pub async fn lines_for(
        conn: &mut PgConnection,
        appointment_ids: &[Uuid],
    ) -> Result<Vec<ServiceLineRow>, sqlx::Error> {
        let query = format!(
            "SELECT {LINE_COLUMNS} FROM appointment_services l \
             JOIN company_services s ON s.id = l.service_id \
             WHERE l.appointment_id = ANY($1) \
             ORDER BY l.appointment_id, l.service_id"
        );
        sqlx::query_as::<_, ServiceLineRow>(&query)
            .bind(appointment_ids)
            .fetch_all(conn)
            .await
    }

    /// List appointments matching all provided filters, ordered by start
    /// time ascending.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` on database failure.
    pub async fn list(
        conn: &mut PgConnection,
        filter: &AppointmentFilter,
    ) -> Result<Vec<AppointmentRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM appointments \
             WHERE ($1::uuid IS NULL OR user_id = $1) \
               AND ($2::bigint IS NULL OR company_id = $2) \
               AND ($3::timestamptz IS NULL OR start_time >= $3) \
               AND ($4::timestamptz IS NULL OR end_time <= $4) \
               AND ($5::appointment_status IS NULL OR status = $5) \
             ORDER BY start_time ASC \
             OFFSET $6 LIMIT $7"
        );
        sqlx::query_as::<_, AppointmentRow>(&query)
            .bind(filter.user_id)
            .bind(filter.company_id)
            .bind(filter.start_from)
            .bind(filter.end_until)
            .bind(filter.status)
            .bind(filter.offset)
            .bind(filter.limit)
            .fetch_all(conn)
            .await
    }
}
