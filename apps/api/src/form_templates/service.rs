//! Owner-scoped storage of reusable form field sets.
//!
//! Field descriptors are opaque: each must be a JSON object, nothing more is
//! checked, and array order is preserved.

use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::models::form_template::{FormTemplateInput, FormTemplateRow};
use crate::repository::{FormTemplateRepository, FORM_TEMPLATES_ID_OWNER_KEY};

#[derive(Debug, Deserialize)]
pub struct FormTemplateRequest {
    /// Required on create; the path names the template on update.
    #[serde(default)]
    pub form_template_id: String,
    pub fields: Value,
}

pub fn validate_template(
    form_template_id: &str,
    request: FormTemplateRequest,
) -> Result<FormTemplateInput, AppError> {
    let form_template_id = form_template_id.trim();
    if form_template_id.is_empty() {
        return Err(AppError::Validation(
            "form_template_id is required".to_string(),
        ));
    }

    let Value::Array(fields) = &request.fields else {
        return Err(AppError::Validation("fields must be a JSON array".to_string()));
    };
    if let Some(index) = fields.iter().position(|f| !f.is_object()) {
        return Err(AppError::Validation(format!(
            "fields[{index}] must be a JSON object"
        )));
    }

    Ok(FormTemplateInput {
        form_template_id: form_template_id.to_string(),
        fields: request.fields,
    })
}

pub async fn create_template(
    templates: &dyn FormTemplateRepository,
    owner: i64,
    request: FormTemplateRequest,
) -> Result<FormTemplateRow, AppError> {
    let id = request.form_template_id.clone();
    let input = validate_template(&id, request)?;

    if templates
        .find_template(owner, &input.form_template_id)
        .await?
        .is_some()
    {
        return Err(AppError::FormTemplateExists);
    }

    let template = templates.insert_template(owner, &input).await.map_err(|e| {
        if e.is_conflict_on(FORM_TEMPLATES_ID_OWNER_KEY) {
            AppError::FormTemplateExists
        } else {
            e.into()
        }
    })?;

    info!(
        user_id = owner,
        form_template_id = %template.form_template_id,
        "Created form template"
    );
    Ok(template)
}

pub async fn update_template(
    templates: &dyn FormTemplateRepository,
    owner: i64,
    form_template_id: &str,
    request: FormTemplateRequest,
) -> Result<FormTemplateRow, AppError> {
    let input = validate_template(form_template_id, request)?;
    templates
        .update_template(owner, &input)
        .await?
        .ok_or(AppError::FormTemplateNotFound)
}

pub async fn get_template(
    templates: &dyn FormTemplateRepository,
    owner: i64,
    form_template_id: &str,
) -> Result<FormTemplateRow, AppError> {
    templates
        .find_template(owner, form_template_id.trim())
        .await?
        .ok_or(AppError::FormTemplateNotFound)
}

pub async fn list_templates(
    templates: &dyn FormTemplateRepository,
    owner: i64,
) -> Result<Vec<FormTemplateRow>, AppError> {
    Ok(templates.list_templates(owner).await?)
}

/// Links built on the template are removed with it.
pub async fn delete_template(
    templates: &dyn FormTemplateRepository,
    owner: i64,
    form_template_id: &str,
) -> Result<(), AppError> {
    if !templates
        .delete_template(owner, form_template_id.trim())
        .await?
    {
        return Err(AppError::FormTemplateNotFound);
    }
    info!(user_id = owner, form_template_id, "Deleted form template");
    Ok(())
}
