use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::{
        alumni_dto::{CreateAlumniPayload, UpdateAlumniPayload},
        response::ApiResponse,
    },
    error::Result,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/alumni",
    responses((status = 200, description = "All alumni"))
)]
#[axum::debug_handler]
pub async fn list_alumni(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let items = state.alumni_service.list().await?;
    Ok(Json(ApiResponse::ok("Alumni retrieved", items)))
}

#[utoipa::path(
    get,
    path = "/api/alumni/{id}",
    params(("id" = i64, Path, description = "Alumni ID")),
    responses(
        (status = 200, description = "Alumni found"),
        (status = 404, description = "Alumni not found")
    )
)]
#[axum::debug_handler]
pub async fn get_alumni(
    State(state): State<AppState>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse> {
    let Path(id) = id?;
    let alumni = state.alumni_service.get_by_id(id).await?;
    Ok(Json(ApiResponse::ok("Alumni retrieved", alumni)))
}

#[utoipa::path(
    post,
    path = "/api/alumni",
    request_body = CreateAlumniPayload,
    responses(
        (status = 201, description = "Alumni created"),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "NIM or email already in use")
    )
)]
#[axum::debug_handler]
pub async fn create_alumni(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateAlumniPayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload?;
    payload.validate()?;
    let alumni = state.alumni_service.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Alumni created", alumni)),
    ))
}

#[utoipa::path(
    put,
    path = "/api/alumni/{id}",
    params(("id" = i64, Path, description = "Alumni ID")),
    request_body = UpdateAlumniPayload,
    responses(
        (status = 200, description = "Alumni updated"),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Alumni not found")
    )
)]
#[axum::debug_handler]
pub async fn update_alumni(
    State(state): State<AppState>,
    id: std::result::Result<Path<i64>, PathRejection>,
    payload: std::result::Result<Json<UpdateAlumniPayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    payload.validate()?;
    let alumni = state.alumni_service.update(id, payload).await?;
    Ok(Json(ApiResponse::ok("Alumni updated", alumni)))
}

#[utoipa::path(
    delete,
    path = "/api/alumni/{id}",
    params(("id" = i64, Path, description = "Alumni ID")),
    responses(
        (status = 200, description = "Alumni and its job records deleted"),
        (status = 404, description = "Alumni not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_alumni(
    State(state): State<AppState>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse> {
    let Path(id) = id?;
    state.alumni_service.delete(id).await?;
    Ok(Json(ApiResponse::<()>::ack("Alumni deleted")))
}
