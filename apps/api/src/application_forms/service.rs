//! Links between a job and a form template, addressed by a public UUID.
//!
//! Management operations require the caller to own the linked job. A link the
//! caller does not own reports `FormNotFound`, same as a missing one.

use std::collections::HashMap;

use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application_form::{
    ApplicationFormRow, ApplicationFormView, FormDetails, FormStatus, NewApplicationForm,
};
use crate::models::form_template::FormTemplateRow;
use crate::models::job::JobRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LinkRequest {
    pub form_template_id: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

/// Path segments that are not UUIDs cannot name a link.
pub fn parse_form_uuid(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::FormNotFound)
}

/// Loads a link and its job, failing unless `owner` owns the job.
pub async fn owned_form(
    state: &AppState,
    owner: i64,
    form_uuid: Uuid,
) -> Result<(ApplicationFormRow, JobRow), AppError> {
    let form = state
        .forms
        .find_form(form_uuid)
        .await?
        .ok_or(AppError::FormNotFound)?;
    let job = state
        .jobs
        .find_job_by_ref(form.job_ref)
        .await?
        .filter(|job| job.user_id == owner)
        .ok_or(AppError::FormNotFound)?;
    Ok((form, job))
}

async fn template_for(
    state: &AppState,
    form: &ApplicationFormRow,
) -> Result<FormTemplateRow, AppError> {
    state
        .templates
        .find_template_by_ref(form.form_template_ref)
        .await?
        .ok_or(AppError::FormNotFound)
}

pub async fn link_form(
    state: &AppState,
    owner: i64,
    job_id: &str,
    request: LinkRequest,
) -> Result<ApplicationFormView, AppError> {
    let job = state
        .jobs
        .find_job(owner, job_id.trim())
        .await?
        .ok_or(AppError::JobNotFound)?;
    let template = state
        .templates
        .find_template(owner, request.form_template_id.trim())
        .await?
        .ok_or(AppError::FormTemplateNotFound)?;

    let form = state
        .forms
        .insert_form(NewApplicationForm {
            form_uuid: Uuid::new_v4(),
            job_ref: job.id,
            form_template_ref: template.id,
            status: FormStatus::Active,
            date_created: Utc::now(),
        })
        .await?;

    info!(
        user_id = owner,
        form_uuid = %form.form_uuid,
        job_id = %job.job_id,
        form_template_id = %template.form_template_id,
        "Linked form template to job"
    );
    Ok(ApplicationFormView::new(&form, &job, &template))
}

pub async fn update_status(
    state: &AppState,
    owner: i64,
    form_uuid: Uuid,
    request: StatusRequest,
) -> Result<ApplicationFormView, AppError> {
    let status: FormStatus = request.status.parse().map_err(AppError::InvalidStatus)?;
    let (_, job) = owned_form(state, owner, form_uuid).await?;

    let form = state
        .forms
        .update_form_status(form_uuid, status)
        .await?
        .ok_or(AppError::FormNotFound)?;
    let template = template_for(state, &form).await?;

    info!(user_id = owner, form_uuid = %form_uuid, status = %status, "Updated form status");
    Ok(ApplicationFormView::new(&form, &job, &template))
}

/// Public view behind a shareable link. Works for inactive links too.
pub async fn get_details(state: &AppState, form_uuid: Uuid) -> Result<FormDetails, AppError> {
    let form = state
        .forms
        .find_form(form_uuid)
        .await?
        .ok_or(AppError::FormNotFound)?;
    let job = state
        .jobs
        .find_job_by_ref(form.job_ref)
        .await?
        .ok_or(AppError::FormNotFound)?;
    let template = template_for(state, &form).await?;

    Ok(FormDetails {
        form_uuid: form.form_uuid,
        status: form.status(),
        date_created: form.date_created,
        job: (&job).into(),
        form_template: (&template).into(),
    })
}

/// Removes the link only. Submissions keep their data with `form_uuid` cleared.
pub async fn delete_form(state: &AppState, owner: i64, form_uuid: Uuid) -> Result<(), AppError> {
    owned_form(state, owner, form_uuid).await?;
    if !state.forms.delete_form(form_uuid).await? {
        return Err(AppError::FormNotFound);
    }
    info!(user_id = owner, form_uuid = %form_uuid, "Deleted form link");
    Ok(())
}

pub async fn list_for_job(
    state: &AppState,
    owner: i64,
    job_id: &str,
) -> Result<Vec<ApplicationFormView>, AppError> {
    let job = state
        .jobs
        .find_job(owner, job_id.trim())
        .await?
        .ok_or(AppError::JobNotFound)?;
    let forms = state.forms.list_forms_for_job(job.id).await?;

    let mut templates: HashMap<i64, FormTemplateRow> = HashMap::new();
    let mut views = Vec::with_capacity(forms.len());
    for form in &forms {
        if !templates.contains_key(&form.form_template_ref) {
            let template = template_for(state, form).await?;
            templates.insert(form.form_template_ref, template);
        }
        if let Some(template) = templates.get(&form.form_template_ref) {
            views.push(ApplicationFormView::new(form, &job, template));
        }
    }
    Ok(views)
}
