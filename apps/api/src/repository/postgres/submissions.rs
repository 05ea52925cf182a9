use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use super::{map_write_error, PgRepository};
use crate::models::submission::{
    Applicant, NewApplicant, NewSubmission, SortBy, SubmissionQuery, SubmissionReceipt,
    SubmissionRow,
};
use crate::repository::{RepoResult, SubmissionRepository};

#[async_trait]
impl SubmissionRepository for PgRepository {
    async fn has_submission(&self, job_ref: i64, user_id: i64) -> RepoResult<bool> {
        Ok(sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM job_submissions WHERE job_ref = $1 AND user_id = $2)",
        )
        .bind(job_ref)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn record_submission(
        &self,
        submission: NewSubmission,
        applicant: Applicant,
    ) -> RepoResult<SubmissionReceipt> {
        let mut tx = self.pool.begin().await?;

        let user_id = match applicant {
            Applicant::Existing(id) => Some(id),
            Applicant::Anonymous => None,
            Applicant::New(new) => Some(insert_applicant(&mut tx, &new).await?),
        };

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO job_submissions
                (job_id, job_ref, user_id, form_uuid, form_data, skills, resume_url, ats_score)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(&submission.job_id)
        .bind(submission.job_ref)
        .bind(user_id)
        .bind(submission.form_uuid)
        .bind(&submission.form_data)
        .bind(&submission.skills)
        .bind(&submission.resume_url)
        .bind(submission.ats_score)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        tx.commit().await?;

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
        // ORDER BY cannot be bound; both variants are fixed strings.
        let order_by = match query.sort_by {
            SortBy::AtsScore => "ats_score DESC, created_at DESC, id DESC",
            SortBy::CreatedAt => "created_at DESC, id DESC",
        };
        let sql = format!(
            r#"
            SELECT * FROM job_submissions
            WHERE form_uuid = $1
              AND ($2::date IS NULL OR (created_at AT TIME ZONE 'UTC')::date = $2)
            ORDER BY {order_by}
            LIMIT $3
            "#
        );

        Ok(sqlx::query_as::<_, SubmissionRow>(&sql)
            .bind(form_uuid)
            .bind(query.created_on)
            .bind(query.limit)
            .fetch_all(&self.pool)
            .await?)
    }
}

/// Inserts an auto-created applicant inside the submission transaction.
/// The id always comes from the sequence, never from the request.
async fn insert_applicant(
    tx: &mut Transaction<'_, Postgres>,
    applicant: &NewApplicant,
) -> RepoResult<i64> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO users (username, email, password_hash)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(&applicant.username)
    .bind(&applicant.email)
    .bind(&applicant.password_hash)
    .fetch_one(&mut **tx)
    .await
    .map_err(map_write_error)?;

    info!(user_id = id, "Auto-created applicant");
    Ok(id)
}
