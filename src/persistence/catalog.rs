//! Repository for users, companies, and company services.
//!
//! Provides the three read interfaces the booking engine consumes
//! (`find_user`, `find_company`, `find_active_service`) plus the CRUD
//! queries behind the catalog endpoints.

use sqlx::PgConnection;
use uuid::Uuid;

use super::models::{CompanyRow, CreateCompany, CreateService, CreateUser, ServiceRow, UpdateService, UserRow};

/// Column list for `users` queries.
const USER_COLUMNS: &str = "id, name, email, phone, is_active, created_at, updated_at";

/// Column list for `companies` queries.
const COMPANY_COLUMNS: &str = "id, name, email, phone, address, is_active, created_at, updated_at";

/// Column list for `company_services` queries.
const SERVICE_COLUMNS: &str =
    "id, company_id, name, description, price, duration_minutes, is_active, created_at, updated_at";

/// Stateless query namespace for catalog tables.
#[derive(Debug)]
pub struct CatalogRepo;

impl CatalogRepo {
    /// Insert a new user, returning the created row.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` on database failure, including the unique
    /// email constraint.
    pub async fn insert_user(
        conn: &mut PgConnection,
        input: &CreateUser,
    ) -> Result<UserRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email, phone) VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, UserRow>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .fetch_one(conn)
            .await
    }

    /// Find a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` on database failure.
    pub async fn find_user(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<UserRow>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Find a user by ID and lock the row for the rest of the transaction.
    ///
    /// The booking engine takes this lock before its check-then-insert
    /// sequence so concurrent bookings for the same user serialize.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` on database failure.
    pub async fn lock_user(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<UserRow>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Insert a new company, returning the created row.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` on database failure, including the unique
    /// name/email constraints.
    pub async fn insert_company(
        conn: &mut PgConnection,
        input: &CreateCompany,
    ) -> Result<CompanyRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO companies (name, email, phone, address) \
             VALUES ($1, $2, $3, $4) RETURNING {COMPANY_COLUMNS}"
        );
        sqlx::query_as::<_, CompanyRow>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.address)
            .fetch_one(conn)
            .await
    }

    /// Find a company by ID.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` on database failure.
    pub async fn find_company(
        conn: &mut PgConnection,
        id: i64,
    ) -> Result<Option<CompanyRow>, sqlx::Error> {
        let query = format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE id = $1");
        sqlx::query_as::<_, CompanyRow>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List companies ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` on database failure.
    pub async fn list_companies(
        conn: &mut PgConnection,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<CompanyRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COMPANY_COLUMNS} FROM companies ORDER BY name ASC OFFSET $1 LIMIT $2"
        );
        sqlx::query_as::<_, CompanyRow>(&query)
            .bind(offset)
            .bind(limit)
            .fetch_all(conn)
            .await
    }

    /// Insert a new service for a company, returning the created row.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` on database failure, including the per-company
    /// unique name constraint.
    pub async fn insert_service(
        conn: &mut PgConnection,
        company_id: i64,
        input: &CreateService,
    ) -> Result<ServiceRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO company_services (company_id, name, description, price, duration_minutes) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {SERVICE_COLUMNS}"
        );
        sqlx::query_as::<_, ServiceRow>(&query)
            .bind(company_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price)
            .bind(input.duration_minutes)
            .fetch_one(conn)
            .await
    }

    /// Find a service that exists, belongs to `company_id`, and is active.
    ///
    /// This is the read the booking engine uses to validate requested
    /// services; anything else counts as "service not found".
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` on database failure.
    pub async fn find_active_service(
        conn: &mut PgConnection,
        id: i64,
        company_id: i64,
    ) -> Result<Option<ServiceRow>, sqlx::Error> {
        let query = format!(
            "SELECT {SERVICE_COLUMNS} FROM company_services \
             WHERE id = $1 AND company_id = $2 AND is_active = TRUE"
        );
        sqlx::query_as::<_, ServiceRow>(&query)
            .bind(id)
            .bind(company_id)
            .fetch_optional(conn)
            .await
    }

    /// List all services of a company (active and inactive), ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` on database failure.
    pub async fn list_services(
        conn: &mut PgConnection,
        company_id: i64,
    ) -> Result<Vec<ServiceRow>, sqlx::Error> {
        let query = format!(
            "SELECT {SERVICE_COLUMNS} FROM company_services WHERE company_id = $1 ORDER BY name ASC"
        );
        sqlx::query_as::<_, ServiceRow>(&query)
            .bind(company_id)
            .fetch_all(conn)
            .await
    }

    /// Update a service. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists. Price changes
    /// never touch existing `price_at_booking` snapshots.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` on database failure.
    pub async fn update_service(
        conn: &mut PgConnection,
        id: i64,
        input: &UpdateService,
    ) -> Result<Option<ServiceRow>, sqlx::Error> {
        let query = format!(
            "UPDATE company_services SET \
                name = COALESCE($2, name), \
                description = COALESCE($3, description), \
                price = COALESCE($4, price), \
                duration_minutes = COALESCE($5, duration_minutes), \
                is_active = COALESCE($6, is_active), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {SERVICE_COLUMNS}"
        );
        sqlx::query_as::<_, ServiceRow>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price)
            .bind(input.duration_minutes)
            .bind(input.is_active)
            .fetch_optional(conn)
            .await
    }
}
