use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    response::{IntoResponse, Json},
};

use crate::{
    dto::{
        job_record_dto::JobRecordResponse,
        lifecycle_dto::{JobRecordSummaryResponse, StateChangePayload, TrashItemResponse},
        response::ApiResponse,
    },
    error::Result,
    middleware::auth::Actor,
    models::job_record::DeletionState,
    AppState,
};

fn state_change_message(state: DeletionState) -> &'static str {
    match state {
        DeletionState::Trashed => "Job record moved to trash",
        DeletionState::Active => "Job record restored",
    }
}

async fn apply_state_change(
    state: &AppState,
    actor: &Actor,
    id: i64,
    payload: StateChangePayload,
) -> Result<Json<ApiResponse<JobRecordResponse>>> {
    let record = state
        .lifecycle_service
        .change_state(actor, id, payload.state)
        .await?;
    Ok(Json(ApiResponse::ok(
        state_change_message(payload.state),
        JobRecordResponse::from(record),
    )))
}

#[utoipa::path(
    put,
    path = "/api/pekerjaan/users/{id}",
    params(("id" = i64, Path, description = "Job record ID")),
    request_body = StateChangePayload,
    responses(
        (status = 200, description = "State changed"),
        (status = 400, description = "Malformed id or unknown state"),
        (status = 403, description = "Caller does not own the job record"),
        (status = 404, description = "Job record not found"),
        (status = 409, description = "Job record is not in the trash")
    )
)]
#[axum::debug_handler]
pub async fn change_state_as_owner(
    State(state): State<AppState>,
    actor: Actor,
    id: std::result::Result<Path<i64>, PathRejection>,
    payload: std::result::Result<Json<StateChangePayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    apply_state_change(&state, &actor, id, payload).await
}

#[utoipa::path(
    put,
    path = "/api/pekerjaan/admin/{id}",
    params(("id" = i64, Path, description = "Job record ID")),
    request_body = StateChangePayload,
    responses(
        (status = 200, description = "State changed"),
        (status = 400, description = "Malformed id or unknown state"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Job record not found"),
        (status = 409, description = "Job record is not in the trash")
    )
)]
#[axum::debug_handler]
pub async fn change_state_as_admin(
    State(state): State<AppState>,
    actor: Actor,
    id: std::result::Result<Path<i64>, PathRejection>,
    payload: std::result::Result<Json<StateChangePayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    apply_state_change(&state, &actor, id, payload).await
}

#[utoipa::path(
    delete,
    path = "/api/pekerjaan/{id}",
    params(("id" = i64, Path, description = "Job record ID")),
    responses(
        (status = 200, description = "Job record moved to trash"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Job record not found")
    )
)]
#[axum::debug_handler]
pub async fn soft_delete(
    State(state): State<AppState>,
    actor: Actor,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse> {
    let Path(id) = id?;
    let record = state.lifecycle_service.soft_delete(&actor, id).await?;
    Ok(Json(ApiResponse::ok(
        state_change_message(DeletionState::Trashed),
        JobRecordResponse::from(record),
    )))
}

#[utoipa::path(
    get,
    path = "/api/pekerjaan/trash",
    responses(
        (status = 200, description = "Trash ledger with record details"),
        (status = 403, description = "Admin role required")
    )
)]
#[axum::debug_handler]
pub async fn list_trash(State(state): State<AppState>, actor: Actor) -> Result<impl IntoResponse> {
    let items = state.lifecycle_service.list_trash(&actor).await?;
    let items: Vec<TrashItemResponse> = items.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::ok("Trash retrieved", items)))
}

#[utoipa::path(
    get,
    path = "/api/pekerjaan/trashed",
    responses(
        (status = 200, description = "Job records currently in the trash"),
        (status = 403, description = "Admin role required")
    )
)]
#[axum::debug_handler]
pub async fn list_trashed(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<impl IntoResponse> {
    let items = state.lifecycle_service.list_trashed(&actor).await?;
    let items: Vec<JobRecordSummaryResponse> = items.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::ok("Trashed job records retrieved", items)))
}

#[utoipa::path(
    put,
    path = "/api/pekerjaan/trash/{id}/restore",
    params(("id" = i64, Path, description = "Trash entry ID")),
    responses(
        (status = 200, description = "Job record restored"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Trash entry not found"),
        (status = 409, description = "Job record is not in the trash")
    )
)]
#[axum::debug_handler]
pub async fn restore(
    State(state): State<AppState>,
    actor: Actor,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse> {
    let Path(id) = id?;
    let summary = state.lifecycle_service.restore(&actor, id).await?;
    Ok(Json(ApiResponse::ok(
        "Job record restored",
        JobRecordSummaryResponse::from(summary),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/pekerjaan/trash/{id}",
    params(("id" = i64, Path, description = "Trash entry ID")),
    responses(
        (status = 200, description = "Job record permanently deleted"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Trash entry not found"),
        (status = 409, description = "Job record is not in the trash")
    )
)]
#[axum::debug_handler]
pub async fn hard_delete(
    State(state): State<AppState>,
    actor: Actor,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse> {
    let Path(id) = id?;
    state.lifecycle_service.hard_delete(&actor, id).await?;
    Ok(Json(ApiResponse::<()>::ack("Job record permanently deleted")))
}
