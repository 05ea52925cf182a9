use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::repository::RepositoryError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid job_id")]
    InvalidJobId,

    #[error("Invalid user_id")]
    InvalidUserId,

    #[error("Invalid user")]
    InvalidUser,

    #[error("Invalid form data: {0}")]
    InvalidFormData(String),

    #[error("Resume file is required")]
    ResumeRequired,

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Job not found")]
    JobNotFound,

    #[error("Form template not found")]
    FormTemplateNotFound,

    #[error("Form not found")]
    FormNotFound,

    #[error("Email already exists")]
    EmailExists,

    #[error("Job already exists for this user")]
    JobExists,

    #[error("Form template already exists for this user")]
    FormTemplateExists,

    #[error("Applicant has already applied for this job")]
    DuplicateApplication,

    #[error("Form is not accepting submissions")]
    FormInactive,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Resume upload failed: {0}")]
    ResumeUploadFailed(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Coarse error taxonomy shared by all variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Unauthorized,
    Dependency,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_)
            | AppError::InvalidJobId
            | AppError::InvalidUserId
            | AppError::InvalidUser
            | AppError::InvalidFormData(_)
            | AppError::ResumeRequired
            | AppError::InvalidStatus(_) => ErrorKind::Validation,
            AppError::JobNotFound | AppError::FormTemplateNotFound | AppError::FormNotFound => {
                ErrorKind::NotFound
            }
            AppError::EmailExists
            | AppError::JobExists
            | AppError::FormTemplateExists
            | AppError::DuplicateApplication
            | AppError::FormInactive => ErrorKind::Conflict,
            AppError::Unauthorized | AppError::InvalidCredentials => ErrorKind::Unauthorized,
            AppError::ResumeUploadFailed(_) | AppError::Database(_) | AppError::Internal(_) => {
                ErrorKind::Dependency
            }
        }
    }

    /// Machine-stable code carried in every error body.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::InvalidJobId => "INVALID_JOB_ID",
            AppError::InvalidUserId => "INVALID_USER_ID",
            AppError::InvalidUser => "INVALID_USER",
            AppError::InvalidFormData(_) => "INVALID_FORM_DATA",
            AppError::ResumeRequired => "RESUME_REQUIRED",
            AppError::InvalidStatus(_) => "INVALID_STATUS",
            AppError::JobNotFound => "JOB_NOT_FOUND",
            AppError::FormTemplateNotFound => "FORM_TEMPLATE_NOT_FOUND",
            AppError::FormNotFound => "FORM_NOT_FOUND",
            AppError::EmailExists => "EMAIL_EXISTS",
            AppError::JobExists => "JOB_EXISTS",
            AppError::FormTemplateExists => "FORM_TEMPLATE_EXISTS",
            AppError::DuplicateApplication => "DUPLICATE_APPLICATION",
            AppError::FormInactive => "FORM_INACTIVE",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::ResumeUploadFailed(_) => "RESUME_UPLOAD_FAILED",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Dependency => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Caller-facing message. Dependency failures are logged, never echoed.
    fn public_message(&self) -> String {
        match self {
            AppError::Unauthorized => "Authentication required".to_string(),
            AppError::ResumeUploadFailed(detail) => {
                tracing::error!("Resume upload failed: {detail}");
                "Failed to upload resume".to_string()
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                "A database error occurred".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Database(e) => AppError::Database(e),
            RepositoryError::Conflict { constraint } => AppError::Internal(anyhow::anyhow!(
                "unhandled constraint violation: {constraint}"
            )),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.public_message()
            }
        }));

        (status, body).into_response()
    }
}
