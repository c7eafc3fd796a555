//! Auth HTTP handlers

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::application::AuthService;
use crate::interfaces::http::common::{reject, ApiResponse, ApiResult, EmptyData};

use super::dto::*;

/// Application state for auth handlers.
#[derive(Clone)]
pub struct AuthAppState {
    pub auth: Arc<AuthService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created, validation code issued", body = ApiResponse<UserDto>),
        (status = 400, description = "Invalid email or password"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AuthAppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<UserDto> {
    let user = state
        .auth
        .register(&request.email, &request.password)
        .await
        .map_err(reject)?;
    Ok(Json(ApiResponse::success(user.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/validate",
    tag = "Auth",
    request_body = ValidateAccountRequest,
    responses(
        (status = 200, description = "Account validated", body = ApiResponse<EmptyData>),
        (status = 400, description = "Unknown account or wrong code")
    )
)]
pub async fn validate_account(
    State(state): State<AuthAppState>,
    Json(request): Json<ValidateAccountRequest>,
) -> ApiResult<EmptyData> {
    state
        .auth
        .validate_account(&request.email, &request.code)
        .await
        .map_err(reject)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = ApiResponse<UserDto>),
        (status = 401, description = "Invalid credentials or unvalidated account")
    )
)]
pub async fn login(
    State(state): State<AuthAppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<UserDto> {
    let user = state
        .auth
        .login(&request.email, &request.password)
        .await
        .map_err(reject)?;
    Ok(Json(ApiResponse::success(user.into())))
}
