use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::form_template::FormTemplateRow;
use crate::models::job::JobRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormStatus {
    Active,
    Inactive,
}

impl FormStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormStatus::Active => "active",
            FormStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for FormStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(FormStatus::Active),
            "inactive" => Ok(FormStatus::Inactive),
            other => Err(format!("status must be 'active' or 'inactive', got '{other}'")),
        }
    }
}

/// `application_form` row: one job linked to one form template.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationFormRow {
    pub form_uuid: Uuid,
    pub job_ref: i64,
    pub form_template_ref: i64,
    pub status: String,
    pub date_created: DateTime<Utc>,
}

impl ApplicationFormRow {
    /// Rows are CHECK-constrained; anything unexpected is treated as closed.
    pub fn status(&self) -> FormStatus {
        self.status.parse().unwrap_or(FormStatus::Inactive)
    }
}

#[derive(Debug, Clone)]
pub struct NewApplicationForm {
    pub form_uuid: Uuid,
    pub job_ref: i64,
    pub form_template_ref: i64,
    pub status: FormStatus,
    pub date_created: DateTime<Utc>,
}

/// Owner-facing view of a link, addressed by external ids.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationFormView {
    pub form_uuid: Uuid,
    pub job_id: String,
    pub form_template_id: String,
    pub status: FormStatus,
    pub date_created: DateTime<Utc>,
}

impl ApplicationFormView {
    pub fn new(row: &ApplicationFormRow, job: &JobRow, template: &FormTemplateRow) -> Self {
        Self {
            form_uuid: row.form_uuid,
            job_id: job.job_id.clone(),
            form_template_id: template.form_template_id.clone(),
            status: row.status(),
            date_created: row.date_created,
        }
    }
}

/// Public payload behind a shareable form link. Carries no owner identity.
#[derive(Debug, Clone, Serialize)]
pub struct FormDetails {
    pub form_uuid: Uuid,
    pub status: FormStatus,
    pub date_created: DateTime<Utc>,
    pub job: JobDetails,
    pub form_template: FormTemplateDetails,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobDetails {
    pub job_id: String,
    pub job_title: String,
    pub job_description: String,
    pub job_status: String,
    pub skills_required: Vec<String>,
    pub attributes: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&JobRow> for JobDetails {
    fn from(job: &JobRow) -> Self {
        Self {
            job_id: job.job_id.clone(),
            job_title: job.job_title.clone(),
            job_description: job.job_description.clone(),
            job_status: job.job_status.clone(),
            skills_required: job.skills_required.clone(),
            attributes: job.attributes.clone(),
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FormTemplateDetails {
    pub form_template_id: String,
    pub fields: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&FormTemplateRow> for FormTemplateDetails {
    fn from(template: &FormTemplateRow) -> Self {
        Self {
            form_template_id: template.form_template_id.clone(),
            fields: template.fields.clone(),
            created_at: template.created_at,
            updated_at: template.updated_at,
        }
    }
}
