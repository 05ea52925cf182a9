//! Public application intake for a shared form link.
//!
//! Everything that can be checked without side effects is checked first. The
//! resume upload is the only external write before the database transaction,
//! and it is removed again if the transaction fails.

use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::password::UNUSABLE_PASSWORD_HASH;
use crate::auth::service::{looks_like_email, normalize_email};
use crate::errors::AppError;
use crate::models::application_form::FormStatus;
use crate::models::submission::{Applicant, NewApplicant, NewSubmission};
use crate::repository::{
    RepositoryError, UserRepository, SUBMISSIONS_JOB_APPLICANT_KEY, USERS_EMAIL_KEY,
};
use crate::state::AppState;
use crate::storage::{resume_key, ResumeUpload, StoredResume};
use crate::submissions::form_data::parse_form_data;
use crate::submissions::scoring::ScoringInput;

const DEFAULT_RESUME_CONTENT_TYPE: &str = "application/octet-stream";

/// Raw multipart fields, as posted.
#[derive(Debug, Default)]
pub struct SubmissionForm {
    pub job_id: Option<String>,
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub form_data: Option<String>,
    pub resume: Option<ResumeFile>,
}

#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub id: i64,
    pub user_id: Option<i64>,
    pub ats_score: i32,
    pub message: &'static str,
}

/// Whose application this is, plus the name used in the resume key.
struct ResolvedApplicant {
    applicant: Applicant,
    display_name: String,
}

impl ResolvedApplicant {
    /// Id known before the transaction runs.
    fn known_id(&self) -> Option<i64> {
        match &self.applicant {
            Applicant::Existing(id) => Some(*id),
            Applicant::New(_) | Applicant::Anonymous => None,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Empty counts as absent; anything else must be a positive integer.
fn parse_user_id(raw: Option<String>) -> Result<Option<i64>, AppError> {
    match non_blank(raw) {
        None => Ok(None),
        Some(raw) => match raw.parse::<i64>() {
            Ok(id) if id > 0 => Ok(Some(id)),
            _ => Err(AppError::InvalidUserId),
        },
    }
}

async fn resolve_applicant(
    users: &dyn UserRepository,
    user_id: Option<i64>,
    username: Option<String>,
    email: Option<String>,
) -> Result<ResolvedApplicant, AppError> {
    let email = email.map(|e| normalize_email(&e));

    if let Some(id) = user_id {
        if let Some(user) = users.find_user_by_id(id).await? {
            return Ok(ResolvedApplicant {
                applicant: Applicant::Existing(user.id),
                display_name: user.username,
            });
        }
        // An unknown id is never reused; the new user gets a generated one.
        return new_applicant(username, email);
    }

    let Some(email) = email else {
        return Ok(ResolvedApplicant {
            applicant: Applicant::Anonymous,
            display_name: username.unwrap_or_default(),
        });
    };

    if let Some(user) = users.find_user_by_email(&email).await? {
        return Ok(ResolvedApplicant {
            applicant: Applicant::Existing(user.id),
            display_name: user.username,
        });
    }
    new_applicant(username, Some(email))
}

/// A user created on the fly needs both a username and a usable email.
/// The placeholder hash means the account can never log in.
fn new_applicant(
    username: Option<String>,
    email: Option<String>,
) -> Result<ResolvedApplicant, AppError> {
    match (username, email) {
        (Some(username), Some(email)) if looks_like_email(&email) => Ok(ResolvedApplicant {
            display_name: username.clone(),
            applicant: Applicant::New(NewApplicant {
                username,
                email,
                password_hash: UNUSABLE_PASSWORD_HASH.to_string(),
            }),
        }),
        _ => Err(AppError::InvalidUser),
    }
}

async fn upload_resume(state: &AppState, upload: ResumeUpload) -> Result<StoredResume, AppError> {
    let timeout = state.config.resume_upload_timeout;
    match tokio::time::timeout(timeout, state.resumes.store(upload)).await {
        Ok(Ok(stored)) => Ok(stored),
        Ok(Err(e)) => Err(AppError::ResumeUploadFailed(e.to_string())),
        Err(_) => Err(AppError::ResumeUploadFailed(format!(
            "upload timed out after {}s",
            timeout.as_secs_f32()
        ))),
    }
}

/// Best effort; a leftover object is logged, not surfaced.
async fn discard_resume(state: &AppState, key: &str) {
    if let Err(e) = state.resumes.discard(key).await {
        warn!("Failed to remove orphaned resume {key}: {e}");
    }
}

fn persist_error(err: RepositoryError) -> AppError {
    if err.is_conflict_on(SUBMISSIONS_JOB_APPLICANT_KEY) {
        AppError::DuplicateApplication
    } else if err.is_conflict_on(USERS_EMAIL_KEY) {
        // Auto-create collided with someone else's email.
        AppError::InvalidUser
    } else {
        err.into()
    }
}

pub async fn submit_application(
    state: &AppState,
    form_uuid: Uuid,
    form: SubmissionForm,
) -> Result<SubmissionResponse, AppError> {
    let link = state
        .forms
        .find_form(form_uuid)
        .await?
        .ok_or(AppError::FormNotFound)?;
    if link.status() != FormStatus::Active {
        return Err(AppError::FormInactive);
    }
    let job = state
        .jobs
        .find_job_by_ref(link.job_ref)
        .await?
        .ok_or(AppError::FormNotFound)?;

    // 1. Primitive fields
    let posted_job_id = non_blank(form.job_id).ok_or(AppError::InvalidJobId)?;
    if posted_job_id != job.job_id {
        return Err(AppError::InvalidJobId);
    }
    let user_id = parse_user_id(form.user_id)?;

    // 2. Who is applying
    let resolved = resolve_applicant(
        state.users.as_ref(),
        user_id,
        non_blank(form.username),
        non_blank(form.email),
    )
    .await?;

    // 3. Fast duplicate check; the unique key on (job, applicant) is the real guard.
    if let Applicant::Existing(id) = resolved.applicant {
        if state.submissions.has_submission(job.id, id).await? {
            return Err(AppError::DuplicateApplication);
        }
    }

    // 4. Answers
    let answers = parse_form_data(form.form_data.as_deref())?;

    // 5. Resume
    let resume = form
        .resume
        .filter(|r| !r.bytes.is_empty())
        .ok_or(AppError::ResumeRequired)?;
    if resume.bytes.len() > state.config.max_resume_bytes {
        return Err(AppError::Validation(format!(
            "resume exceeds {} bytes",
            state.config.max_resume_bytes
        )));
    }
    let key = resume_key(
        form_uuid,
        resolved.known_id(),
        &resolved.display_name,
        resume.file_name.as_deref(),
    );
    let stored = upload_resume(
        state,
        ResumeUpload {
            key,
            bytes: resume.bytes,
            content_type: non_blank(resume.content_type)
                .unwrap_or_else(|| DEFAULT_RESUME_CONTENT_TYPE.to_string()),
        },
    )
    .await?;

    // 6. Score
    let ats_score = state.scorer.score(&ScoringInput {
        candidate_skills: &answers.skills,
        required_skills: &job.skills_required,
    });

    // 7. Persist applicant and submission together
    let submission = NewSubmission {
        job_id: job.job_id.clone(),
        job_ref: job.id,
        form_uuid,
        form_data: answers.value,
        skills: answers.skills,
        resume_url: stored.url.clone(),
        ats_score,
    };
    let receipt = match state
        .submissions
        .record_submission(submission, resolved.applicant)
        .await
    {
        Ok(receipt) => receipt,
        Err(e) => {
            discard_resume(state, &stored.key).await;
            return Err(persist_error(e));
        }
    };

    info!(
        submission_id = receipt.id,
        user_id = ?receipt.user_id,
        form_uuid = %form_uuid,
        job_id = %job.job_id,
        ats_score,
        "Application submitted"
    );

    Ok(SubmissionResponse {
        id: receipt.id,
        user_id: receipt.user_id,
        ats_score: receipt.ats_score,
        message: "Application submitted successfully",
    })
}
