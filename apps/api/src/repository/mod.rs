//! Storage seams for every entity.
//!
//! Services depend on these traits only. `PgRepository` implements all of them
//! against PostgreSQL; tests use the in-memory implementation, which enforces
//! the same uniqueness and cascade rules as the schema.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::application_form::{ApplicationFormRow, FormStatus, NewApplicationForm};
use crate::models::form_template::{FormTemplateInput, FormTemplateRow};
use crate::models::job::{JobInput, JobRow};
use crate::models::submission::{
    Applicant, NewSubmission, SubmissionQuery, SubmissionReceipt, SubmissionRow,
};
use crate::models::user::{NewUser, UserRow};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgRepository;

// Constraint names from migrations/0001_init.sql.
pub const USERS_EMAIL_KEY: &str = "users_email_key";
pub const JOBS_JOB_ID_OWNER_KEY: &str = "jobs_job_id_owner_key";
pub const FORM_TEMPLATES_ID_OWNER_KEY: &str = "form_templates_id_owner_key";
pub const SUBMISSIONS_JOB_APPLICANT_KEY: &str = "job_submissions_job_applicant_key";

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("unique constraint violated: {constraint}")]
    Conflict { constraint: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl RepositoryError {
    pub fn is_conflict_on(&self, name: &str) -> bool {
        matches!(self, RepositoryError::Conflict { constraint } if constraint == name)
    }
}

pub type RepoResult<T> = Result<T, RepositoryError>;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert_user(&self, user: NewUser) -> RepoResult<UserRow>;
    async fn find_user_by_id(&self, id: i64) -> RepoResult<Option<UserRow>>;
    async fn find_user_by_email(&self, email: &str) -> RepoResult<Option<UserRow>>;
}

/// Every method except `find_job_by_ref` is scoped to the owning user.
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn insert_job(&self, owner: i64, job: &JobInput) -> RepoResult<JobRow>;
    async fn update_job(&self, owner: i64, job: &JobInput) -> RepoResult<Option<JobRow>>;
    async fn find_job(&self, owner: i64, job_id: &str) -> RepoResult<Option<JobRow>>;
    async fn find_job_by_ref(&self, job_ref: i64) -> RepoResult<Option<JobRow>>;
    async fn search_jobs_by_title(&self, owner: i64, title: &str) -> RepoResult<Vec<JobRow>>;
    async fn list_jobs_by_status(&self, owner: i64, status: &str) -> RepoResult<Vec<JobRow>>;
    async fn list_jobs(&self, owner: i64) -> RepoResult<Vec<JobRow>>;
    async fn delete_job(&self, owner: i64, job_id: &str) -> RepoResult<bool>;
}

#[async_trait]
pub trait FormTemplateRepository: Send + Sync {
    async fn insert_template(
        &self,
        owner: i64,
        template: &FormTemplateInput,
    ) -> RepoResult<FormTemplateRow>;
    async fn update_template(
        &self,
        owner: i64,
        template: &FormTemplateInput,
    ) -> RepoResult<Option<FormTemplateRow>>;
    async fn find_template(
        &self,
        owner: i64,
        form_template_id: &str,
    ) -> RepoResult<Option<FormTemplateRow>>;
    async fn find_template_by_ref(&self, template_ref: i64)
        -> RepoResult<Option<FormTemplateRow>>;
    async fn list_templates(&self, owner: i64) -> RepoResult<Vec<FormTemplateRow>>;
    async fn delete_template(&self, owner: i64, form_template_id: &str) -> RepoResult<bool>;
}

#[async_trait]
pub trait ApplicationFormRepository: Send + Sync {
    async fn insert_form(&self, form: NewApplicationForm) -> RepoResult<ApplicationFormRow>;
    async fn find_form(&self, form_uuid: Uuid) -> RepoResult<Option<ApplicationFormRow>>;
    async fn list_forms_for_job(&self, job_ref: i64) -> RepoResult<Vec<ApplicationFormRow>>;
    async fn update_form_status(
        &self,
        form_uuid: Uuid,
        status: FormStatus,
    ) -> RepoResult<Option<ApplicationFormRow>>;
    async fn delete_form(&self, form_uuid: Uuid) -> RepoResult<bool>;
}

#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    async fn has_submission(&self, job_ref: i64, user_id: i64) -> RepoResult<bool>;

    /// Creates the applicant (if new) and the submission atomically.
    /// A second submission for the same (job, applicant) fails with
    /// `Conflict` on [`SUBMISSIONS_JOB_APPLICANT_KEY`].
    async fn record_submission(
        &self,
        submission: NewSubmission,
        applicant: Applicant,
    ) -> RepoResult<SubmissionReceipt>;

    async fn list_submissions(
        &self,
        form_uuid: Uuid,
        query: &SubmissionQuery,
    ) -> RepoResult<Vec<SubmissionRow>>;
}
