use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::form_templates::service::{self, FormTemplateRequest};
use crate::models::form_template::FormTemplateRow;
use crate::state::AppState;

/// POST /api/v1/forms/templates
pub async fn handle_create_template(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<FormTemplateRequest>,
) -> Result<(StatusCode, Json<FormTemplateRow>), AppError> {
    let template =
        service::create_template(state.templates.as_ref(), auth.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

/// PUT /api/v1/forms/templates/:id
pub async fn handle_update_template(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<FormTemplateRequest>,
) -> Result<Json<FormTemplateRow>, AppError> {
    let template =
        service::update_template(state.templates.as_ref(), auth.user_id, &id, request).await?;
    Ok(Json(template))
}

/// GET /api/v1/forms/templates/:id
pub async fn handle_get_template(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<FormTemplateRow>, AppError> {
    let template = service::get_template(state.templates.as_ref(), auth.user_id, &id).await?;
    Ok(Json(template))
}

/// GET /api/v1/forms/templates
pub async fn handle_list_templates(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<FormTemplateRow>>, AppError> {
    let templates = service::list_templates(state.templates.as_ref(), auth.user_id).await?;
    Ok(Json(templates))
}

/// DELETE /api/v1/forms/templates/:id
pub async fn handle_delete_template(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    service::delete_template(state.templates.as_ref(), auth.user_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
