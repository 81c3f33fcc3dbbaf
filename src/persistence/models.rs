//! Database row types and repository input structs.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::AppointmentStatus;

/// A row from the `users` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    /// Primary key (delegated identity UUID).
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Unique email address.
    pub email: String,
    /// Optional phone number.
    pub phone: Option<String>,
    /// Whether the user may book appointments.
    pub is_active: bool,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for inserting a user row.
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Display name.
    pub name: String,
    /// Unique email address.
    pub email: String,
    /// Optional phone number.
    pub phone: Option<String>,
}

/// A row from the `companies` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CompanyRow {
    /// Primary key.
    pub id: i64,
    /// Unique company name.
    pub name: String,
    /// Unique contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Optional street address.
    pub address: Option<String>,
    /// Whether the company is operating.
    pub is_active: bool,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for inserting a company row.
#[derive(Debug, Clone)]
pub struct CreateCompany {
    /// Unique company name.
    pub name: String,
    /// Unique contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Optional street address.
    pub address: Option<String>,
}

/// A row from the `company_services` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ServiceRow {
    /// Primary key.
    pub id: i64,
    /// Owning company.
    pub company_id: i64,
    /// Service name, unique within the company.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Current catalog price.
    pub price: Decimal,
    /// Expected duration in minutes.
    pub duration_minutes: i32,
    /// Whether the service can be booked.
    pub is_active: bool,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for inserting a service row.
#[derive(Debug, Clone)]
pub struct CreateService {
    /// Service name, unique within the company.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Initial catalog price.
    pub price: Decimal,
    /// Expected duration in minutes.
    pub duration_minutes: i32,
}

/// Partial update for a service row. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default)]
pub struct UpdateService {
    /// New service name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New catalog price. Existing bookings keep their snapshots.
    pub price: Option<Decimal>,
    /// New duration in minutes.
    pub duration_minutes: Option<i32>,
    /// Activate or deactivate the service.
    pub is_active: Option<bool>,
}

/// A row from the `appointments` table, without its service lines.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AppointmentRow {
    /// Primary key.
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
}

/// A row from the `appointment_services` join table, with the service name
/// joined in from the catalog.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ServiceLineRow {
    /// Owning appointment.
    pub appointment_id: Uuid,
    /// Booked catalog service.
    pub service_id: i64,
    /// Service name at read time.
    pub service_name: String,
    /// Booked quantity.
    pub quantity: i32,
    /// Price snapshot taken at booking time.
    pub price_at_booking: Decimal,
}

/// AND-combined filters and pagination for listing appointments.
#[derive(Debug, Clone, Default)]
pub struct AppointmentFilter {
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
    /// Number of rows to skip.
    pub offset: i64,
    /// Maximum number of rows to return.
    pub limit: i64,
}
