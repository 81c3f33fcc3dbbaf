//! Catalog DTOs: users, companies, and company services.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::persistence::models::{
    CompanyRow, CreateCompany, CreateService, CreateUser, ServiceRow, UpdateService, UserRow,
};

/// Request body for `POST /users`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    /// Display name.
    pub name: String,
    /// Unique email address.
    pub email: String,
    /// Optional phone number.
    #[serde(default)]
    pub phone: Option<String>,
}

impl CreateUserRequest {
    /// Converts into the repository input after request-local validation.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] on an empty name or malformed
    /// email.
    pub fn into_input(self) -> Result<CreateUser, ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::InvalidRequest("name must not be empty".to_string()));
        }
        if !self.email.contains('@') {
            return Err(ApiError::InvalidRequest("email is not valid".to_string()));
        }
        Ok(CreateUser {
            name: self.name,
            email: self.email,
            phone: self.phone,
        })
    }
}

/// User representation in API responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    /// Unique identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Whether the user may book appointments.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for UserResponse {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Request body for `POST /companies`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCompanyRequest {
    /// Unique company name.
    pub name: String,
    /// Unique contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Optional street address.
    #[serde(default)]
    pub address: Option<String>,
}

impl CreateCompanyRequest {
    /// Converts into the repository input after request-local validation.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] on an empty name or malformed
    /// email.
    pub fn into_input(self) -> Result<CreateCompany, ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::InvalidRequest("name must not be empty".to_string()));
        }
        if !self.email.contains('@') {
            return Err(ApiError::InvalidRequest("email is not valid".to_string()));
        }
        Ok(CreateCompany {
            name: self.name,
            email: self.email,
            phone: self.phone,
            address: self.address,
        })
    }
}

/// Company representation in API responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct CompanyResponse {
    /// Unique identifier.
    pub id: i64,
    /// Company name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Street address.
    pub address: Option<String>,
    /// Whether the company is operating.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<CompanyRow> for CompanyResponse {
    fn from(row: CompanyRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            address: row.address,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Request body for `POST /companies/{id}/services`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateServiceRequest {
    /// Service name, unique within the company.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Catalog price.
    pub price: Decimal,
    /// Expected duration in minutes. Defaults to 30.
    #[serde(default = "default_duration")]
    pub duration_minutes: i32,
}

fn default_duration() -> i32 {
    30
}

impl CreateServiceRequest {
    /// Converts into the repository input after request-local validation.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] on an empty name, negative
    /// price, or non-positive duration.
    pub fn into_input(self) -> Result<CreateService, ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::InvalidRequest("name must not be empty".to_string()));
        }
        if self.price < Decimal::ZERO {
            return Err(ApiError::InvalidRequest(
                "price must not be negative".to_string(),
            ));
        }
        if self.duration_minutes <= 0 {
            return Err(ApiError::InvalidRequest(
                "duration must be positive".to_string(),
            ));
        }
        Ok(CreateService {
            name: self.name,
            description: self.description,
            price: self.price,
            duration_minutes: self.duration_minutes,
        })
    }
}

/// Request body for `PATCH /services/{id}`. All fields optional.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateServiceRequest {
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

impl UpdateServiceRequest {
    /// Converts into the repository input after request-local validation.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] on a negative price or
    /// non-positive duration.
    pub fn into_input(self) -> Result<UpdateService, ApiError> {
        if matches!(self.price, Some(p) if p < Decimal::ZERO) {
            return Err(ApiError::InvalidRequest(
                "price must not be negative".to_string(),
            ));
        }
        if matches!(self.duration_minutes, Some(d) if d <= 0) {
            return Err(ApiError::InvalidRequest(
                "duration must be positive".to_string(),
            ));
        }
        Ok(UpdateService {
            name: self.name,
            description: self.description,
            price: self.price,
            duration_minutes: self.duration_minutes,
            is_active: self.is_active,
        })
    }
}

/// Service representation in API responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceResponse {
    /// Unique identifier.
    pub id: i64,
    /// Owning company.
    pub company_id: i64,
    /// Service name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Current catalog price.
    pub price: Decimal,
    /// Expected duration in minutes.
    pub duration_minutes: i32,
    /// Whether the service can be booked.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<ServiceRow> for ServiceResponse {
    fn from(row: ServiceRow) -> Self {
        Self {
            id: row.id,
            company_id: row.company_id,
            name: row.name,
            description: row.description,
            price: row.price,
            duration_minutes: row.duration_minutes,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn user_request_requires_plausible_email() {
        let bad = CreateUserRequest {
            name: "Ada".to_string(),
            email: "not-an-email".to_string(),
            phone: None,
        };
        assert!(matches!(bad.into_input(), Err(ApiError::InvalidRequest(_))));
    }

    #[test]
    fn service_request_rejects_negative_price() {
        let bad = CreateServiceRequest {
            name: "Trim".to_string(),
            description: None,
            price: Decimal::new(-100, 2),
            duration_minutes: 30,
        };
        assert!(matches!(bad.into_input(), Err(ApiError::InvalidRequest(_))));
    }

    #[test]
    fn service_request_duration_defaults_to_thirty() {
        let json = r#"{ "name": "Trim", "price": "25.00" }"#;
        let parsed: CreateServiceRequest = match serde_json::from_str(json) {
            Ok(v) => v,
            Err(e) => panic!("parse failed: {e}"),
        };
        assert_eq!(parsed.duration_minutes, 30);
        assert_eq!(parsed.price, Decimal::new(2500, 2));
    }

    #[test]
    fn service_patch_rejects_zero_duration() {
        let bad = UpdateServiceRequest {
            duration_minutes: Some(0),
            ..UpdateServiceRequest::default()
        };
        assert!(matches!(bad.into_input(), Err(ApiError::InvalidRequest(_))));
    }
}
