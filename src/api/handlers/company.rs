//! Company handlers: companies and their service catalogs.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};

use crate::api::dto::{
    CompanyResponse, CreateCompanyRequest, CreateServiceRequest, PageParams, ServiceResponse,
    UpdateServiceRequest,
};
use crate::app_state::AppState;
use crate::error::{ApiError, ErrorResponse};

/// `POST /companies` — Register a company.
///
/// # Errors
///
/// Returns [`ApiError::InvalidRequest`] on validation failure or a
/// duplicate name or email.
#[utoipa::path(
    post,
    path = "/api/v1/companies",
    tag = "Companies",
    summary = "Create a company",
    description = "Registers a service provider. Company names and emails are unique.",
    request_body = CreateCompanyRequest,
    responses(
        (status = 201, description = "Company created", body = CompanyResponse),
        (status = 400, description = "Invalid request or name/email already registered", body = ErrorResponse),
    )
)]
pub async fn create_company(
    State(state): State<AppState>,
    Json(req): Json<CreateCompanyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = req.into_input()?;
    let company = state.catalog.create_company(input).await?;
    Ok((StatusCode::CREATED, Json(CompanyResponse::from(company))))
}

/// `GET /companies` — List companies.
///
/// # Errors
///
/// Returns [`ApiError`] on storage failures.
#[utoipa::path(
    get,
    path = "/api/v1/companies",
    tag = "Companies",
    summary = "List companies",
    description = "Returns companies ordered by name with offset/limit pagination, limit capped at 100.",
    responses(
        (status = 200, description = "Companies", body = Vec<CompanyResponse>),
    )
)]
pub async fn list_companies(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, ApiError> {
    let page = params.clamped();
    let companies = state.catalog.list_companies(page.offset, page.limit).await?;
    let data: Vec<CompanyResponse> = companies.into_iter().map(CompanyResponse::from).collect();
    Ok(Json(data))
}

/// `GET /companies/:id` — Get a company by id.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the company does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/companies/{id}",
    tag = "Companies",
    summary = "Get a company",
    params(
        ("id" = i64, Path, description = "Company ID"),
    ),
    responses(
        (status = 200, description = "Company details", body = CompanyResponse),
        (status = 404, description = "Company not found", body = ErrorResponse),
    )
)]
pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let company = state.catalog.get_company(id).await?;
    Ok(Json(CompanyResponse::from(company)))
}

/// `POST /companies/:id/services` — Add a service to a company's catalog.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the company does not exist, or
/// [`ApiError::InvalidRequest`] on validation failure or a duplicate
/// service name.
#[utoipa::path(
    post,
    path = "/api/v1/companies/{id}/services",
    tag = "Companies",
    summary = "Create a service",
    description = "Adds a bookable service to a company's catalog. Service names are unique per company; the price here is the catalog price snapshotted into future bookings.",
    params(
        ("id" = i64, Path, description = "Company ID"),
    ),
    request_body = CreateServiceRequest,
    responses(
        (status = 201, description = "Service created", body = ServiceResponse),
        (status = 400, description = "Invalid request or service name already used by this company", body = ErrorResponse),
        (status = 404, description = "Company not found", body = ErrorResponse),
    )
)]
pub async fn create_service(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<CreateServiceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = req.into_input()?;
    let service = state.catalog.create_service(id, input).await?;
    Ok((StatusCode::CREATED, Json(ServiceResponse::from(service))))
}

/// `GET /companies/:id/services` — List a company's services.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the company does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/companies/{id}/services",
    tag = "Companies",
    summary = "List services",
    description = "Returns all services of a company, active and inactive.",
    params(
        ("id" = i64, Path, description = "Company ID"),
    ),
    responses(
        (status = 200, description = "Services", body = Vec<ServiceResponse>),
        (status = 404, description = "Company not found", body = ErrorResponse),
    )
)]
pub async fn list_services(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let services = state.catalog.list_services(id).await?;
    let data: Vec<ServiceResponse> = services.into_iter().map(ServiceResponse::from).collect();
    Ok(Json(data))
}

/// `PATCH /services/:id` — Partially update a service.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the service does not exist, or
/// [`ApiError::InvalidRequest`] on validation failure.
#[utoipa::path(
    patch,
    path = "/api/v1/services/{id}",
    tag = "Companies",
    summary = "Update a service",
    description = "Applies a partial update to a service. Price changes never rewrite the snapshots of existing bookings.",
    params(
        ("id" = i64, Path, description = "Service ID"),
    ),
    request_body = UpdateServiceRequest,
    responses(
        (status = 200, description = "Updated service", body = ServiceResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Service not found", body = ErrorResponse),
    )
)]
pub async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateServiceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = req.into_input()?;
    let service = state.catalog.update_service(id, input).await?;
    Ok(Json(ServiceResponse::from(service)))
}

/// Company and service-catalog routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/companies", post(create_company).get(list_companies))
        .route("/companies/{id}", get(get_company))
        .route(
            "/companies/{id}/services",
            post(create_service).get(list_services),
        )
        .route("/services/{id}", patch(update_service))
}
