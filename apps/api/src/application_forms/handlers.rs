use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::application_forms::service::{self, parse_form_uuid, LinkRequest, StatusRequest};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::application_form::{ApplicationFormView, FormDetails};
use crate::state::AppState;

/// POST /api/v1/jobs/:job_id/forms
pub async fn handle_link_form(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(job_id): Path<String>,
    Json(request): Json<LinkRequest>,
) -> Result<(StatusCode, Json<ApplicationFormView>), AppError> {
    let view = service::link_form(&state, auth.user_id, &job_id, request).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/v1/jobs/:job_id/forms
pub async fn handle_list_job_forms(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(job_id): Path<String>,
) -> Result<Json<Vec<ApplicationFormView>>, AppError> {
    let views = service::list_for_job(&state, auth.user_id, &job_id).await?;
    Ok(Json(views))
}

/// PATCH /api/v1/forms/:form_uuid/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(form_uuid): Path<String>,
    Json(request): Json<StatusRequest>,
) -> Result<Json<ApplicationFormView>, AppError> {
    let form_uuid = parse_form_uuid(&form_uuid)?;
    let view = service::update_status(&state, auth.user_id, form_uuid, request).await?;
    Ok(Json(view))
}

/// GET /api/v1/forms/:form_uuid
///
/// Unauthenticated: this is the payload behind a shared application link.
pub async fn handle_get_details(
    State(state): State<AppState>,
    Path(form_uuid): Path<String>,
) -> Result<Json<FormDetails>, AppError> {
    let form_uuid = parse_form_uuid(&form_uuid)?;
    let details = service::get_details(&state, form_uuid).await?;
    Ok(Json(details))
}

/// DELETE /api/v1/forms/:form_uuid
pub async fn handle_delete_form(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(form_uuid): Path<String>,
) -> Result<StatusCode, AppError> {
    let form_uuid = parse_form_uuid(&form_uuid)?;
    service::delete_form(&state, auth.user_id, form_uuid).await?;
    Ok(StatusCode::NO_CONTENT)
}
