use axum::{
    extract::{
        multipart::{Field, MultipartError, MultipartRejection},
        Multipart, Path, Query, State,
    },
    http::StatusCode,
    Json,
};

use crate::application_forms::service::parse_form_uuid;
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::submission::SubmissionRow;
use crate::state::AppState;
use crate::submissions::intake::{self, ResumeFile, SubmissionForm, SubmissionResponse};
use crate::submissions::listing::{self, ListingParams};

fn bad_multipart(e: MultipartError) -> AppError {
    AppError::Validation(format!("invalid multipart body: {e}"))
}

async fn text(field: Field<'_>) -> Result<String, AppError> {
    field.text().await.map_err(bad_multipart)
}

/// Collects the known fields; unknown ones are skipped.
async fn read_submission_form(mut multipart: Multipart) -> Result<SubmissionForm, AppError> {
    let mut form = SubmissionForm::default();

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "job_id" => form.job_id = Some(text(field).await?),
            "user_id" => form.user_id = Some(text(field).await?),
            "username" => form.username = Some(text(field).await?),
            "email" => form.email = Some(text(field).await?),
            "form_data" => form.form_data = Some(text(field).await?),
            "resume" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(bad_multipart)?;
                form.resume = Some(ResumeFile {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            _ => {}
        }
    }

    Ok(form)
}

/// POST /api/v1/forms/:form_uuid/submit
///
/// Unauthenticated so external applicants can apply through a shared link.
pub async fn handle_submit(
    State(state): State<AppState>,
    Path(form_uuid): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<SubmissionResponse>), AppError> {
    let form_uuid = parse_form_uuid(&form_uuid)?;
    let multipart = multipart
        .map_err(|e| AppError::Validation(format!("expected a multipart/form-data body: {e}")))?;
    let form = read_submission_form(multipart).await?;
    let response = intake::submit_application(&state, form_uuid, form).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/forms/:form_uuid/submissions?sort_by=&limit=&date=
pub async fn handle_list_submissions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(form_uuid): Path<String>,
    Query(params): Query<ListingParams>,
) -> Result<Json<Vec<SubmissionRow>>, AppError> {
    let form_uuid = parse_form_uuid(&form_uuid)?;
    let rows = listing::list_submissions(&state, auth.user_id, form_uuid, &params).await?;
    Ok(Json(rows))
}
