use std::sync::Arc;

use crate::auth::TokenKeys;
use crate::config::Config;
use crate::repository::{
    ApplicationFormRepository, FormTemplateRepository, JobRepository, SubmissionRepository,
    UserRepository,
};
use crate::storage::ResumeStore;
use crate::submissions::scoring::AtsScorer;

/// Shared application state injected into all route handlers via Axum extractors.
/// Built once in `main`; every collaborator is a trait object so tests can swap them.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub jobs: Arc<dyn JobRepository>,
    pub templates: Arc<dyn FormTemplateRepository>,
    pub forms: Arc<dyn ApplicationFormRepository>,
    pub submissions: Arc<dyn SubmissionRepository>,
    /// Object store for resumes. S3 in production, in-memory in tests.
    pub resumes: Arc<dyn ResumeStore>,
    /// Pluggable ATS scorer, selected by `ATS_SCORER`.
    pub scorer: Arc<dyn AtsScorer>,
    pub tokens: TokenKeys,
    pub config: Config,
}

impl AppState {
    /// Wires one repository implementation into every storage seam.
    pub fn new<R>(repository: Arc<R>, resumes: Arc<dyn ResumeStore>, config: Config) -> Self
    where
        R: UserRepository
            + JobRepository
            + FormTemplateRepository
            + ApplicationFormRepository
            + SubmissionRepository
            + 'static,
    {
        Self {
            users: repository.clone(),
            jobs: repository.clone(),
            templates: repository.clone(),
            forms: repository.clone(),
            submissions: repository,
            resumes,
            scorer: config.ats_scorer.build(),
            tokens: TokenKeys::new(config.jwt_secret.as_bytes(), config.token_ttl_hours),
            config,
        }
    }
}
