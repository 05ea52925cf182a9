pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::application_forms::handlers as forms;
use crate::auth::handlers as auth;
use crate::form_templates::handlers as templates;
use crate::jobs::handlers as jobs;
use crate::state::AppState;
use crate::submissions::handlers as submissions;

/// Room for the non-file multipart fields on top of the resume itself.
const INTAKE_FORM_OVERHEAD: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let intake_limit = state
        .config
        .max_resume_bytes
        .saturating_add(INTAKE_FORM_OVERHEAD);

    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/v1/register", post(auth::handle_register))
        .route("/api/v1/login", post(auth::handle_login))
        // Jobs
        .route(
            "/api/v1/jobs",
            post(jobs::handle_create_job).get(jobs::handle_list_jobs),
        )
        .route("/api/v1/jobs/title/:title", get(jobs::handle_jobs_by_title))
        .route(
            "/api/v1/jobs/status/:status",
            get(jobs::handle_jobs_by_status),
        )
        .route(
            "/api/v1/jobs/:job_id",
            get(jobs::handle_get_job)
                .put(jobs::handle_update_job)
                .delete(jobs::handle_delete_job),
        )
        .route(
            "/api/v1/jobs/:job_id/forms",
            post(forms::handle_link_form).get(forms::handle_list_job_forms),
        )
        // Form templates
        .route(
            "/api/v1/forms/templates",
            post(templates::handle_create_template).get(templates::handle_list_templates),
        )
        .route(
            "/api/v1/forms/templates/:id",
            get(templates::handle_get_template)
                .put(templates::handle_update_template)
                .delete(templates::handle_delete_template),
        )
        // Application form links
        .route(
            "/api/v1/forms/:form_uuid",
            get(forms::handle_get_details).delete(forms::handle_delete_form),
        )
        .route(
            "/api/v1/forms/:form_uuid/status",
            patch(forms::handle_update_status),
        )
        // Submissions
        .route(
            "/api/v1/forms/:form_uuid/submit",
            post(submissions::handle_submit).layer(DefaultBodyLimit::max(intake_limit)),
        )
        .route(
            "/api/v1/forms/:form_uuid/submissions",
            get(submissions::handle_list_submissions),
        )
        .with_state(state)
}
