use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::{
        auth_dto::{LoginPayload, LoginResponse, RegisterPayload, UserResponse},
        response::ApiResponse,
    },
    error::Result,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterPayload,
    responses(
        (status = 201, description = "Account created"),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Username or email already registered")
    )
)]
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RegisterPayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload?;
    payload.validate()?;
    let user = state.user_service.register(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Registration successful", UserResponse::from(user))),
    ))
}

#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Token issued"),
        (status = 401, description = "Invalid email or password")
    )
)]
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LoginPayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload?;
    payload.validate()?;
    let (token, user) = state.user_service.login(payload, &state.auth).await?;
    Ok(Json(ApiResponse::ok(
        "Login successful",
        LoginResponse {
            token,
            user: UserResponse::from(user),
        },
    )))
}
