//! Owner-scoped CRUD over job postings.
//!
//! Every lookup is keyed by (job_id, owner). A job owned by someone else is
//! indistinguishable from a job that does not exist.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::info;

use crate::errors::AppError;
use crate::models::job::{JobInput, JobRow};
use crate::repository::{JobRepository, JOBS_JOB_ID_OWNER_KEY};

#[derive(Debug, Deserialize)]
pub struct JobRequest {
    /// Required on create; ignored on update, where the path names the job.
    #[serde(default)]
    pub job_id: String,
    pub job_title: String,
    pub job_description: String,
    pub job_status: String,
    #[serde(default)]
    pub skills_required: Vec<String>,
    #[serde(default)]
    pub attributes: Option<Value>,
}

/// Static route segments under `/jobs`; a job with one of these ids could
/// never be addressed by id.
const RESERVED_JOB_IDS: [&str; 2] = ["title", "status"];

fn required(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Validates a request into the stored shape. `attributes` must be an object
/// when present; its contents are opaque.
pub fn validate_job(job_id: &str, request: JobRequest) -> Result<JobInput, AppError> {
    let attributes = match request.attributes {
        None | Some(Value::Null) => Value::Object(Map::new()),
        Some(Value::Object(map)) => Value::Object(map),
        Some(_) => {
            return Err(AppError::Validation(
                "attributes must be a JSON object".to_string(),
            ))
        }
    };

    let job_id = required("job_id", job_id)?;
    if RESERVED_JOB_IDS.contains(&job_id.as_str()) {
        return Err(AppError::Validation(format!("job_id '{job_id}' is reserved")));
    }

    Ok(JobInput {
        job_id,
        job_title: required("job_title", &request.job_title)?,
        job_description: required("job_description", &request.job_description)?,
        job_status: required("job_status", &request.job_status)?,
        skills_required: request
            .skills_required
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        attributes,
    })
}

pub async fn create_job(
    jobs: &dyn JobRepository,
    owner: i64,
    request: JobRequest,
) -> Result<JobRow, AppError> {
    let job_id = request.job_id.clone();
    let input = validate_job(&job_id, request)?;

    if jobs.find_job(owner, &input.job_id).await?.is_some() {
        return Err(AppError::JobExists);
    }

    let job = jobs.insert_job(owner, &input).await.map_err(|e| {
        if e.is_conflict_on(JOBS_JOB_ID_OWNER_KEY) {
            AppError::JobExists
        } else {
            e.into()
        }
    })?;

    info!(user_id = owner, job_id = %job.job_id, "Created job");
    Ok(job)
}

pub async fn update_job(
    jobs: &dyn JobRepository,
    owner: i64,
    job_id: &str,
    request: JobRequest,
) -> Result<JobRow, AppError> {
    let input = validate_job(job_id, request)?;
    let job = jobs
        .update_job(owner, &input)
        .await?
        .ok_or(AppError::JobNotFound)?;

    info!(user_id = owner, job_id = %job.job_id, "Updated job");
    Ok(job)
}

pub async fn get_job(
    jobs: &dyn JobRepository,
    owner: i64,
    job_id: &str,
) -> Result<JobRow, AppError> {
    jobs.find_job(owner, job_id.trim())
        .await?
        .ok_or(AppError::JobNotFound)
}

/// Case-insensitive substring match on the title.
pub async fn jobs_by_title(
    jobs: &dyn JobRepository,
    owner: i64,
    title: &str,
) -> Result<Vec<JobRow>, AppError> {
    Ok(jobs.search_jobs_by_title(owner, title.trim()).await?)
}

pub async fn jobs_by_status(
    jobs: &dyn JobRepository,
    owner: i64,
    status: &str,
) -> Result<Vec<JobRow>, AppError> {
    Ok(jobs.list_jobs_by_status(owner, status.trim()).await?)
}

pub async fn list_jobs(jobs: &dyn JobRepository, owner: i64) -> Result<Vec<JobRow>, AppError> {
    Ok(jobs.list_jobs(owner).await?)
}

/// Hard delete. The job's links go with it; its submissions stay, detached.
pub async fn delete_job(
    jobs: &dyn JobRepository,
    owner: i64,
    job_id: &str,
) -> Result<(), AppError> {
    if !jobs.delete_job(owner, job_id.trim()).await? {
        return Err(AppError::JobNotFound);
    }
    info!(user_id = owner, job_id, "Deleted job");
    Ok(())
}
