use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SubmissionRow {
    pub id: i64,
    pub job_id: String,
    /// `None` once the job has been deleted; `job_id` keeps the external id.
    #[serde(skip_serializing)]
    pub job_ref: Option<i64>,
    pub user_id: Option<i64>,
    pub form_uuid: Option<Uuid>,
    pub form_data: Value,
    pub skills: Vec<String>,
    pub resume_url: String,
    pub ats_score: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub job_id: String,
    pub job_ref: i64,
    pub form_uuid: Uuid,
    pub form_data: Value,
    pub skills: Vec<String>,
    pub resume_url: String,
    pub ats_score: i32,
}

/// Applicant record created alongside the submission, in the same transaction.
/// The store assigns the id.
#[derive(Debug, Clone)]
pub struct NewApplicant {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Copy)]
pub struct SubmissionReceipt {
    pub id: i64,
    pub user_id: Option<i64>,
    pub ats_score: i32,
}

/// Who a submission is recorded against.
#[derive(Debug, Clone)]
pub enum Applicant {
    Existing(i64),
    New(NewApplicant),
    Anonymous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    AtsScore,
    CreatedAt,
}

/// Resolved listing parameters; parsing and fallbacks happen before this point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionQuery {
    pub sort_by: SortBy,
    pub limit: i64,
    /// Only submissions created on this UTC date; `None` means all dates.
    pub created_on: Option<NaiveDate>,
}
