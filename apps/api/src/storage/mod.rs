//! Resume object storage.
//!
//! Intake hands resume bytes to a [`ResumeStore`] and keeps only the durable
//! URL it returns. Production uses S3; tests inject the in-memory store.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use uuid::Uuid;

#[cfg(test)]
pub mod memory;
pub mod s3;

pub use s3::S3ResumeStore;

const MAX_USERNAME_SEGMENT: usize = 64;
const MAX_EXTENSION_LEN: usize = 10;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("upload failed: {0}")]
    Upload(String),

    #[error("delete failed: {0}")]
    Delete(String),
}

#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub key: String,
    pub bytes: Bytes,
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredResume {
    pub key: String,
    pub url: String,
}

#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn store(&self, upload: ResumeUpload) -> Result<StoredResume, StorageError>;

    /// Removes an object written by `store`. Used to clean up after a failed submission.
    async fn discard(&self, key: &str) -> Result<(), StorageError>;
}

/// `resumes/<form_uuid>/<applicant>_<username><ext>`.
///
/// The applicant segment is the user id when one is known up front, otherwise
/// `anonymous-<uuid>` so concurrent uploads never collide.
pub fn resume_key(
    form_uuid: Uuid,
    applicant_id: Option<i64>,
    username: &str,
    file_name: Option<&str>,
) -> String {
    let applicant = match applicant_id {
        Some(id) => id.to_string(),
        None => format!("anonymous-{}", Uuid::new_v4()),
    };
    let extension = file_name.and_then(extension).unwrap_or_default();
    format!(
        "resumes/{form_uuid}/{applicant}_{}{extension}",
        sanitize_username(username)
    )
}

/// Keeps `[a-z0-9_-]`, maps everything else to `_`.
pub fn sanitize_username(username: &str) -> String {
    let cleaned: String = username
        .trim()
        .chars()
        .take(MAX_USERNAME_SEGMENT)
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "applicant".to_string()
    } else {
        cleaned
    }
}

/// `.pdf` from `Resume.PDF`; `None` for odd or missing extensions.
fn extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let valid = !ext.is_empty()
        && ext.len() <= MAX_EXTENSION_LEN
        && ext.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then(|| format!(".{}", ext.to_ascii_lowercase()))
}

pub fn public_url(base_url: &str, key: &str) -> String {
    format!("{}/{key}", base_url.trim_end_matches('/'))
}
