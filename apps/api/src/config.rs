use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::submissions::scoring::ScorerKind;

const MIN_JWT_SECRET_LEN: usize = 16;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub s3_bucket: String,
    pub s3_endpoint: Option<String>,
    pub s3_region: String,
    /// Base used to build durable resume URLs. Derived from bucket/endpoint when unset.
    pub s3_public_base_url: String,
    pub resume_upload_timeout: Duration,
    pub max_resume_bytes: usize,
    pub ats_scorer: ScorerKind,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let jwt_secret = require_env("JWT_SECRET")?;
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            bail!("JWT_SECRET must be at least {MIN_JWT_SECRET_LEN} bytes long");
        }

        let s3_bucket = require_env("S3_BUCKET")?;
        let s3_endpoint = optional_env("S3_ENDPOINT");
        let s3_region = optional_env("S3_REGION").unwrap_or_else(|| "us-east-1".to_string());
        let s3_public_base_url = optional_env("S3_PUBLIC_BASE_URL").unwrap_or_else(|| {
            default_public_base_url(&s3_bucket, s3_endpoint.as_deref())
        });

        let ats_scorer = match optional_env("ATS_SCORER") {
            Some(raw) => raw
                .parse::<ScorerKind>()
                .map_err(|e| anyhow::anyhow!("ATS_SCORER: {e}"))?,
            None => ScorerKind::SkillCount,
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            database_max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 10)?,
            jwt_secret,
            token_ttl_hours: parse_env("TOKEN_TTL_HOURS", 24)?,
            s3_bucket,
            s3_endpoint,
            s3_region,
            s3_public_base_url,
            resume_upload_timeout: Duration::from_secs(parse_env(
                "RESUME_UPLOAD_TIMEOUT_SECS",
                30,
            )?),
            max_resume_bytes: parse_env("MAX_RESUME_BYTES", 10 * 1024 * 1024)?,
            ats_scorer,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

fn default_public_base_url(bucket: &str, endpoint: Option<&str>) -> String {
    match endpoint {
        // Path-style addressing, which is what MinIO serves.
        Some(endpoint) => format!("{}/{bucket}", endpoint.trim_end_matches('/')),
        None => format!("https://{bucket}.s3.amazonaws.com"),
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/jobboard_test".to_string(),
            database_max_connections: 1,
            jwt_secret: "test-secret-at-least-16-bytes".to_string(),
            token_ttl_hours: 24,
            s3_bucket: "test-bucket".to_string(),
            s3_endpoint: None,
            s3_region: "us-east-1".to_string(),
            s3_public_base_url: "https://test-bucket.s3.amazonaws.com".to_string(),
            resume_upload_timeout: Duration::from_secs(5),
            max_resume_bytes: 1024 * 1024,
            ats_scorer: ScorerKind::SkillCount,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}
