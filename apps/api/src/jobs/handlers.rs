use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::jobs::service::{self, JobRequest};
use crate::models::job::JobRow;
use crate::state::AppState;

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<JobRequest>,
) -> Result<(StatusCode, Json<JobRow>), AppError> {
    let job = service::create_job(state.jobs.as_ref(), auth.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// PUT /api/v1/jobs/:job_id
pub async fn handle_update_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(job_id): Path<String>,
    Json(request): Json<JobRequest>,
) -> Result<Json<JobRow>, AppError> {
    let job = service::update_job(state.jobs.as_ref(), auth.user_id, &job_id, request).await?;
    Ok(Json(job))
}

/// GET /api/v1/jobs/:job_id
pub async fn handle_get_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(job_id): Path<String>,
) -> Result<Json<JobRow>, AppError> {
    let job = service::get_job(state.jobs.as_ref(), auth.user_id, &job_id).await?;
    Ok(Json(job))
}

/// GET /api/v1/jobs/title/:title
pub async fn handle_jobs_by_title(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(title): Path<String>,
) -> Result<Json<Vec<JobRow>>, AppError> {
    let jobs = service::jobs_by_title(state.jobs.as_ref(), auth.user_id, &title).await?;
    Ok(Json(jobs))
}

/// GET /api/v1/jobs/status/:status
pub async fn handle_jobs_by_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(status): Path<String>,
) -> Result<Json<Vec<JobRow>>, AppError> {
    let jobs = service::jobs_by_status(state.jobs.as_ref(), auth.user_id, &status).await?;
    Ok(Json(jobs))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<JobRow>>, AppError> {
    let jobs = service::list_jobs(state.jobs.as_ref(), auth.user_id).await?;
    Ok(Json(jobs))
}

/// DELETE /api/v1/jobs/:job_id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(job_id): Path<String>,
) -> Result<StatusCode, AppError> {
    service::delete_job(state.jobs.as_ref(), auth.user_id, &job_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
