use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    /// Surrogate key; links reference it, callers never see it.
    #[serde(skip_serializing)]
    pub id: i64,
    pub job_id: String,
    #[serde(skip_serializing)]
    pub user_id: i64,
    pub job_title: String,
    pub job_description: String,
    pub job_status: String,
    pub skills_required: Vec<String>,
    pub attributes: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated write model for create and full-replace update.
#[derive(Debug, Clone, PartialEq)]
pub struct JobInput {
    pub job_id: String,
    pub job_title: String,
    pub job_description: String,
    pub job_status: String,
    pub skills_required: Vec<String>,
    pub attributes: Value,
}
