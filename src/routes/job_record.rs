use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::{
        job_record_dto::{
            CreateJobRecordPayload, JobRecordListQuery, JobRecordListResponse, JobRecordResponse,
            UpdateJobRecordPayload,
        },
        response::ApiResponse,
    },
    error::Result,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/pekerjaan",
    params(
        ("page" = Option<i64>, Query, description = "Page number, starting at 1"),
        ("limit" = Option<i64>, Query, description = "Items per page (1-100)"),
        ("search" = Option<String>, Query, description = "Matches company, position, industry or location"),
        ("sort_by" = Option<String>, Query, description = "Sort column"),
        ("order" = Option<String>, Query, description = "asc or desc")
    ),
    responses(
        (status = 200, description = "Active job records")
    )
)]
#[axum::debug_handler]
pub async fn list_job_records(
    State(state): State<AppState>,
    query: std::result::Result<Query<JobRecordListQuery>, QueryRejection>,
) -> Result<impl IntoResponse> {
    let Query(query) = query?;
    let page = state.job_record_service.list(query).await?;
    Ok(Json(ApiResponse::ok(
        "Job records retrieved",
        JobRecordListResponse::from(page),
    )))
}

#[utoipa::path(
    get,
    path = "/api/pekerjaan/{id}",
    params(("id" = i64, Path, description = "Job record ID")),
    responses(
        (status = 200, description = "Job record found"),
        (status = 404, description = "Job record not found")
    )
)]
#[axum::debug_handler]
pub async fn get_job_record(
    State(state): State<AppState>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse> {
    let Path(id) = id?;
    let record = state.job_record_service.get_by_id(id).await?;
    Ok(Json(ApiResponse::ok(
        "Job record retrieved",
        JobRecordResponse::from(record),
    )))
}

#[utoipa::path(
    get,
    path = "/api/pekerjaan/alumni/{alumni_id}",
    params(("alumni_id" = i64, Path, description = "Alumni ID")),
    responses(
        (status = 200, description = "Active job records of one alumni")
    )
)]
#[axum::debug_handler]
pub async fn list_by_alumni(
    State(state): State<AppState>,
    alumni_id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse> {
    let Path(alumni_id) = alumni_id?;
    let items = state.job_record_service.list_by_alumni(alumni_id).await?;
    let items: Vec<JobRecordResponse> = items.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::ok("Job records retrieved", items)))
}

#[utoipa::path(
    post,
    path = "/api/pekerjaan",
    request_body = CreateJobRecordPayload,
    responses(
        (status = 201, description = "Job record created"),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Admin role required")
    )
)]
#[axum::debug_handler]
pub async fn create_job_record(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateJobRecordPayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload?;
    payload.validate()?;
    let record = state.job_record_service.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            "Job record created",
            JobRecordResponse::from(record),
        )),
    ))
}

#[utoipa::path(
    put,
    path = "/api/pekerjaan/{id}",
    params(("id" = i64, Path, description = "Job record ID")),
    request_body = UpdateJobRecordPayload,
    responses(
        (status = 200, description = "Job record updated"),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Job record not found")
    )
)]
#[axum::debug_handler]
pub async fn update_job_record(
    State(state): State<AppState>,
    id: std::result::Result<Path<i64>, PathRejection>,
    payload: std::result::Result<Json<UpdateJobRecordPayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    payload.validate()?;
    let record = state.job_record_service.update(id, payload).await?;
    Ok(Json(ApiResponse::ok(
        "Job record updated",
        JobRecordResponse::from(record),
    )))
}
