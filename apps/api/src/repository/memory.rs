//! In-memory repository - TEST ONLY.
//!
//! Mirrors the schema's unique keys and ON DELETE behaviour so service and
//! router tests exercise the same rules as PostgreSQL.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::application_form::{ApplicationFormRow, FormStatus, NewApplicationForm};
use crate::models::form_template::{FormTemplateInput, FormTemplateRow};
use crate::models::job::{JobInput, JobRow};
use crate::models::submission::{
    Applicant, NewSubmission, SortBy, SubmissionQuery, SubmissionReceipt, SubmissionRow,
};
use crate::models::user::{NewUser, UserRow};
use crate::repository::{
    ApplicationFormRepository, FormTemplateRepository, JobRepository, RepoResult,
    RepositoryError, SubmissionRepository, UserRepository, FORM_TEMPLATES_ID_OWNER_KEY,
    JOBS_JOB_ID_OWNER_KEY, SUBMISSIONS_JOB_APPLICANT_KEY, USERS_EMAIL_KEY,
};

#[derive(Default)]
struct Tables {
    users: Vec<UserRow>,
    jobs: Vec<JobRow>,
    templates: Vec<FormTemplateRow>,
    forms: Vec<ApplicationFormRow>,
    submissions: Vec<SubmissionRow>,
    next_user_id: i64,
    next_job_id: i64,
    next_template_id: i64,
    next_submission_id: i64,
}

impl Tables {
    fn next(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }

    fn detach_forms(&mut self, removed: &[Uuid]) {
        for submission in &mut self.submissions {
            if submission.form_uuid.is_some_and(|uuid| removed.contains(&uuid)) {
                submission.form_uuid = None;
            }
        }
    }

    fn conflict(constraint: &str) -> RepositoryError {
        RepositoryError::Conflict {
            constraint: constraint.to_string(),
        }
    }
}

#[derive(Default)]
pub struct InMemoryRepository {
    tables: Mutex<Tables>,
    fail_next_submission: AtomicBool,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `record_submission` fail with a database error.
    pub fn fail_next_submission(&self) {
        self.fail_next_submission.store(true, Ordering::SeqCst);
    }

    pub fn set_submission_created_at(&self, id: i64, created_at: DateTime<Utc>) {
        let mut tables = self.tables.lock().unwrap();
        if let Some(row) = tables.submissions.iter_mut().find(|s| s.id == id) {
            row.created_at = created_at;
        }
    }

    pub fn submission_count(&self) -> usize {
        self.tables.lock().unwrap().submissions.len()
    }

    pub fn user_count(&self) -> usize {
        self.tables.lock().unwrap().users.len()
    }

    pub fn submission(&self, id: i64) -> Option<SubmissionRow> {
        let tables = self.tables.lock().unwrap();
        tables.submissions.iter().find(|s| s.id == id).cloned()
    }
}

fn newest_first<T>(rows: &mut [T], key: impl Fn(&T) -> (DateTime<Utc>, i64)) {
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn insert_user(&self, user: NewUser) -> RepoResult<UserRow> {
        let mut tables = self.tables.lock().unwrap();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(Tables::conflict(USERS_EMAIL_KEY));
        }
        let now = Utc::now();
        let row = UserRow {
            id: Tables::next(&mut tables.next_user_id),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(row.clone());
        Ok(row)
    }

    async fn find_user_by_id(&self, id: i64) -> RepoResult<Option<UserRow>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> RepoResult<Option<UserRow>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl JobRepository for InMemoryRepository {
    async fn insert_job(&self, owner: i64, job: &JobInput) -> RepoResult<JobRow> {
        let mut tables = self.tables.lock().unwrap();
        if tables
            .jobs
            .iter()
            .any(|j| j.user_id == owner && j.job_id == job.job_id)
        {
            return Err(Tables::conflict(JOBS_JOB_ID_OWNER_KEY));
        }
        let now = Utc::now();
        let row = JobRow {
            id: Tables::next(&mut tables.next_job_id),
            job_id: job.job_id.clone(),
            user_id: owner,
            job_title: job.job_title.clone(),
            job_description: job.job_description.clone(),
            job_status: job.job_status.clone(),
            skills_required: job.skills_required.clone(),
            attributes: job.attributes.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.jobs.push(row.clone());
        Ok(row)
    }

    async fn update_job(&self, owner: i64, job: &JobInput) -> RepoResult<Option<JobRow>> {
        let mut tables = self.tables.lock().unwrap();
        let Some(row) = tables
            .jobs
            .iter_mut()
            .find(|j| j.user_id == owner && j.job_id == job.job_id)
        else {
            return Ok(None);
        };
        row.job_title = job.job_title.clone();
        row.job_description = job.job_description.clone();
        row.job_status = job.job_status.clone();
        row.skills_required = job.skills_required.clone();
        row.attributes = job.attributes.clone();
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn find_job(&self, owner: i64, job_id: &str) -> RepoResult<Option<JobRow>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .jobs
            .iter()
            .find(|j| j.user_id == owner && j.job_id == job_id)
            .cloned())
    }

    async fn find_job_by_ref(&self, job_ref: i64) -> RepoResult<Option<JobRow>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.jobs.iter().find(|j| j.id == job_ref).cloned())
    }

    async fn search_jobs_by_title(&self, owner: i64, title: &str) -> RepoResult<Vec<JobRow>> {
        let needle = title.to_lowercase();
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<JobRow> = tables
            .jobs
            .iter()
            .filter(|j| j.user_id == owner && j.job_title.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        newest_first(&mut rows, |j| (j.created_at, j.id));
        Ok(rows)
    }

    async fn list_jobs_by_status(&self, owner: i64, status: &str) -> RepoResult<Vec<JobRow>> {
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<JobRow> = tables
            .jobs
            .iter()
            .filter(|j| j.user_id == owner && j.job_status == status)
            .cloned()
            .collect();
        newest_first(&mut rows, |j| (j.created_at, j.id));
        Ok(rows)
    }

    async fn list_jobs(&self, owner: i64) -> RepoResult<Vec<JobRow>> {
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<JobRow> = tables
            .jobs
            .iter()
            .filter(|j| j.user_id == owner)
            .cloned()
            .collect();
        newest_first(&mut rows, |j| (j.created_at, j.id));
        Ok(rows)
    }

    async fn delete_job(&self, owner: i64, job_id: &str) -> RepoResult<bool> {
        let mut tables = self.tables.lock().unwrap();
        let Some(pos) = tables
            .jobs
            .iter()
            .position(|j| j.user_id == owner && j.job_id == job_id)
        else {
            return Ok(false);
        };
        let job = tables.jobs.remove(pos);
        let removed: Vec<Uuid> = tables
            .forms
            .iter()
            .filter(|f| f.job_ref == job.id)
            .map(|f| f.form_uuid)
            .collect();
        tables.forms.retain(|f| f.job_ref != job.id);
        for submission in tables
            .submissions
            .iter_mut()
            .filter(|s| s.job_ref == Some(job.id))
        {
            submission.job_ref = None;
        }
        tables.detach_forms(&removed);
        Ok(true)
    }
}

#[async_trait]
impl FormTemplateRepository for InMemoryRepository {
    async fn insert_template(
        &self,
        owner: i64,
        template: &FormTemplateInput,
    ) -> RepoResult<FormTemplateRow> {
        let mut tables = self.tables.lock().unwrap();
        if tables
            .templates
            .iter()
            .any(|t| t.user_id == owner && t.form_template_id == template.form_template_id)
        {
            return Err(Tables::conflict(FORM_TEMPLATES_ID_OWNER_KEY));
        }
        let now = Utc::now();
        let row = FormTemplateRow {
            id: Tables::next(&mut tables.next_template_id),
            form_template_id: template.form_template_id.clone(),
            user_id: owner,
            fields: template.fields.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.templates.push(row.clone());
        Ok(row)
    }

    async fn update_template(
        &self,
        owner: i64,
        template: &FormTemplateInput,
    ) -> RepoResult<Option<FormTemplateRow>> {
        let mut tables = self.tables.lock().unwrap();
        let Some(row) = tables
            .templates
            .iter_mut()
            .find(|t| t.user_id == owner && t.form_template_id == template.form_template_id)
        else {
            return Ok(None);
        };
        row.fields = template.fields.clone();
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn find_template(
        &self,
        owner: i64,
        form_template_id: &str,
    ) -> RepoResult<Option<FormTemplateRow>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .templates
            .iter()
            .find(|t| t.user_id == owner && t.form_template_id == form_template_id)
            .cloned())
    }

    async fn find_template_by_ref(
        &self,
        template_ref: i64,
    ) -> RepoResult<Option<FormTemplateRow>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.templates.iter().find(|t| t.id == template_ref).cloned())
    }

    async fn list_templates(&self, owner: i64) -> RepoResult<Vec<FormTemplateRow>> {
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<FormTemplateRow> = tables
            .templates
            .iter()
            .filter(|t| t.user_id == owner)
            .cloned()
            .collect();
        newest_first(&mut rows, |t| (t.created_at, t.id));
        Ok(rows)
    }

    async fn delete_template(&self, owner: i64, form_template_id: &str) -> RepoResult<bool> {
        let mut tables = self.tables.lock().unwrap();
        let Some(pos) = tables
            .templates
            .iter()
            .position(|t| t.user_id == owner && t.form_template_id == form_template_id)
        else {
            return Ok(false);
        };
        let template = tables.templates.remove(pos);
        let removed: Vec<Uuid> = tables
            .forms
            .iter()
            .filter(|f| f.form_template_ref == template.id)
            .map(|f| f.form_uuid)
            .collect();
        tables.forms.retain(|f| f.form_template_ref != template.id);
        tables.detach_forms(&removed);
        Ok(true)
    }
}

#[async_trait]
impl ApplicationFormRepository for InMemoryRepository {
    async fn insert_form(&self, form: NewApplicationForm) -> RepoResult<ApplicationFormRow> {
        let mut tables = self.tables.lock().unwrap();
        if tables.forms.iter().any(|f| f.form_uuid == form.form_uuid) {
            return Err(Tables::conflict("application_form_pkey"));
        }
        let row = ApplicationFormRow {
            form_uuid: form.form_uuid,
            job_ref: form.job_ref,
            form_template_ref: form.form_template_ref,
            status: form.status.as_str().to_string(),
            date_created: form.date_created,
        };
        tables.forms.push(row.clone());
        Ok(row)
    }

    async fn find_form(&self, form_uuid: Uuid) -> RepoResult<Option<ApplicationFormRow>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.forms.iter().find(|f| f.form_uuid == form_uuid).cloned())
    }

    async fn list_forms_for_job(&self, job_ref: i64) -> RepoResult<Vec<ApplicationFormRow>> {
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<ApplicationFormRow> = tables
            .forms
            .iter()
            .filter(|f| f.job_ref == job_ref)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date_created.cmp(&a.date_created));
        Ok(rows)
    }

    async fn update_form_status(
        &self,
        form_uuid: Uuid,
        status: FormStatus,
    ) -> RepoResult<Option<ApplicationFormRow>> {
        let mut tables = self.tables.lock().unwrap();
        let Some(row) = tables.forms.iter_mut().find(|f| f.form_uuid == form_uuid) else {
            return Ok(None);
        };
        row.status = status.as_str().to_string();
        Ok(Some(row.clone()))
    }

    async fn delete_form(&self, form_uuid: Uuid) -> RepoResult<bool> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.forms.len();
        tables.forms.retain(|f| f.form_uuid != form_uuid);
        let deleted = tables.forms.len() < before;
        if deleted {
            tables.detach_forms(&[form_uuid]);
        }
        Ok(deleted)
    }
}

#[async_trait]
impl SubmissionRepository for InMemoryRepository {
    async fn has_submission(&self, job_ref: i64, user_id: i64) -> RepoResult<bool> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .submissions
            .iter()
            .any(|s| s.job_ref == Some(job_ref) && s.user_id == Some(user_id)))
    }

    async fn record_submission(
        &self,
        submission: NewSubmission,
        applicant: Applicant,
    ) -> RepoResult<SubmissionReceipt> {
        if self.fail_next_submission.swap(false, Ordering::SeqCst) {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }

        let mut tables = self.tables.lock().unwrap();
        let now = Utc::now();

        // Validate everything before mutating so a failure leaves no partial state.
        let (user_id, new_user) = match applicant {
            Applicant::Existing(id) => (Some(id), None),
            Applicant::Anonymous => (None, None),
            Applicant::New(new) => {
                if tables.users.iter().any(|u| u.email == new.email) {
                    return Err(Tables::conflict(USERS_EMAIL_KEY));
                }
                let row = UserRow {
                    id: tables.next_user_id + 1,
                    username: new.username,
                    email: new.email,
                    password_hash: new.password_hash,
                    created_at: now,
                    updated_at: now,
                };
                (Some(row.id), Some(row))
            }
        };

        if let Some(uid) = user_id {
            if tables
                .submissions
                .iter()
                .any(|s| s.job_ref == Some(submission.job_ref) && s.user_id == Some(uid))
            {
                return Err(Tables::conflict(SUBMISSIONS_JOB_APPLICANT_KEY));
            }
        }

        if let Some(row) = new_user {
            tables.next_user_id = row.id;
            tables.users.push(row);
        }

        let id = Tables::next(&mut tables.next_submission_id);
        tables.submissions.push(SubmissionRow {
            id,
            job_id: submission.job_id,
            job_ref: Some(submission.job_ref),
            user_id,
            form_uuid: Some(submission.form_uuid),
            form_data: submission.form_data,
            skills: submission.skills,
            resume_url: submission.resume_url,
            ats_score: submission.ats_score,
            created_at: now,
        });

        Ok(SubmissionReceipt {
            id,
            user_id,
            ats_score: submission.ats_score,
        })
    }

    async fn list_submissions(
        &self,
        form_uuid: Uuid,
        query: &SubmissionQuery,
    ) -> RepoResult<Vec<SubmissionRow>> {
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<SubmissionRow> = tables
            .submissions
            .iter()
            .filter(|s| s.form_uuid == Some(form_uuid))
            .filter(|s| {
                query
                    .created_on
                    .map_or(true, |day| s.created_at.date_naive() == day)
            })
            .cloned()
            .collect();
        match query.sort_by {
            SortBy::AtsScore => rows.sort_by(|a, b| {
                (b.ats_score, b.created_at, b.id).cmp(&(a.ats_score, a.created_at, a.id))
            }),
            SortBy::CreatedAt => newest_first(&mut rows, |s| (s.created_at, s.id)),
        }
        rows.truncate(usize::try_from(query.limit).unwrap_or(0));
        Ok(rows)
    }
}
