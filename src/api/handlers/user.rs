//! User handlers: booking profiles referenced by appointments.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use crate::api::dto::{CreateUserRequest, UserResponse};
use crate::app_state::AppState;
use crate::error::{ApiError, ErrorResponse};

/// `POST /users` — Register a booking profile.
///
/// # Errors
///
/// Returns [`ApiError::InvalidRequest`] on validation failure.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    summary = "Create a user",
    description = "Registers a booking profile. Email addresses are unique across users.",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid request or email already registered", body = ErrorResponse),
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = req.into_input()?;
    let user = state.catalog.create_user(input).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// `GET /users/:id` — Get a user by id.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the user does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    summary = "Get a user",
    params(
        ("id" = Uuid, Path, description = "User UUID"),
    ),
    responses(
        (status = 200, description = "User details", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.catalog.get_user(id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// User routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/{id}", get(get_user))
}
