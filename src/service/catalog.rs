//! Catalog orchestration: users, companies, and company services.
//!
//! Thin coordination over [`CatalogRepo`]; the interesting invariants live
//! in the schema (unique names/emails, price and duration checks).

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{ApiError, Entity};
use crate::persistence::CatalogRepo;
use crate::persistence::models::{
    CompanyRow, CreateCompany, CreateService, CreateUser, ServiceRow, UpdateService, UserRow,
};

/// Orchestrates catalog operations against the database.
#[derive(Debug, Clone)]
pub struct CatalogService {
    pool: PgPool,
}

impl CatalogService {
    /// Creates a new catalog service over the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Registers a booking profile for a (delegated) identity.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] on a duplicate email, or a
    /// storage error.
    pub async fn create_user(&self, input: CreateUser) -> Result<UserRow, ApiError> {
        let mut conn = self.pool.acquire().await?;
        let user = CatalogRepo::insert_user(&mut conn, &input).await?;
        tracing::info!(user_id = %user.id, "user created");
        Ok(user)
    }

    /// Fetches a user by ID.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the user does not exist.
    pub async fn get_user(&self, id: Uuid) -> Result<UserRow, ApiError> {
        let mut conn = self.pool.acquire().await?;
        CatalogRepo::find_user(&mut conn, id)
            .await?
            .ok_or(ApiError::NotFound(Entity::User))
    }

    /// Registers a new company.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] on a duplicate name or email,
    /// or a storage error.
    pub async fn create_company(&self, input: CreateCompany) -> Result<CompanyRow, ApiError> {
        let mut conn = self.pool.acquire().await?;
        let company = CatalogRepo::insert_company(&mut conn, &input).await?;
        tracing::info!(company_id = company.id, name = %company.name, "company created");
        Ok(company)
    }

    /// Fetches a company by ID.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the company does not exist.
    pub async fn get_company(&self, id: i64) -> Result<CompanyRow, ApiError> {
        let mut conn = self.pool.acquire().await?;
        CatalogRepo::find_company(&mut conn, id)
            .await?
            .ok_or(ApiError::NotFound(Entity::Company))
    }

    /// Lists companies ordered by name.
    ///
    /// # Errors
    ///
    /// Returns a storage error on database failure.
    pub async fn list_companies(&self, offset: i64, limit: i64) -> Result<Vec<CompanyRow>, ApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(CatalogRepo::list_companies(&mut conn, offset, limit).await?)
    }

    /// Adds a service to a company's catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the company does not exist, or
    /// [`ApiError::InvalidRequest`] on a duplicate service name.
    pub async fn create_service(
        &self,
        company_id: i64,
        input: CreateService,
    ) -> Result<ServiceRow, ApiError> {
        let mut conn = self.pool.acquire().await?;
        CatalogRepo::find_company(&mut conn, company_id)
            .await?
            .ok_or(ApiError::NotFound(Entity::Company))?;
        let service = CatalogRepo::insert_service(&mut conn, company_id, &input).await?;
        tracing::info!(service_id = service.id, company_id, "service created");
        Ok(service)
    }

    /// Lists all services of a company, active and inactive.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the company does not exist.
    pub async fn list_services(&self, company_id: i64) -> Result<Vec<ServiceRow>, ApiError> {
        let mut conn = self.pool.acquire().await?;
        CatalogRepo::find_company(&mut conn, company_id)
            .await?
            .ok_or(ApiError::NotFound(Entity::Company))?;
        Ok(CatalogRepo::list_services(&mut conn, company_id).await?)
    }

    /// Applies a partial update to a service. Changing the price never
    /// affects existing booking snapshots.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the service does not exist.
    pub async fn update_service(
        &self,
        id: i64,
        input: UpdateService,
    ) -> Result<ServiceRow, ApiError> {
        let mut conn = self.pool.acquire().await?;
        CatalogRepo::update_service(&mut conn, id, &input)
            .await?
            .ok_or(ApiError::NotFound(Entity::Service))
    }
}
