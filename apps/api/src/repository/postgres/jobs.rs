use async_trait::async_trait;

use super::{escape_like, map_write_error, PgRepository};
use crate::models::job::{JobInput, JobRow};
use crate::repository::{JobRepository, RepoResult};

#[async_trait]
impl JobRepository for PgRepository {
    async fn insert_job(&self, owner: i64, job: &JobInput) -> RepoResult<JobRow> {
        sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO jobs
                (job_id, user_id, job_title, job_description, job_status,
                 skills_required, attributes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&job.job_id)
        .bind(owner)
        .bind(&job.job_title)
        .bind(&job.job_description)
        .bind(&job.job_status)
        .bind(&job.skills_required)
        .bind(&job.attributes)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn update_job(&self, owner: i64, job: &JobInput) -> RepoResult<Option<JobRow>> {
        Ok(sqlx::query_as::<_, JobRow>(
            r#"
            UPDATE jobs SET
                job_title = $1,
                job_description = $2,
                job_status = $3,
                skills_required = $4,
                attributes = $5,
                updated_at = NOW()
            WHERE job_id = $6 AND user_id = $7
            RETURNING *
            "#,
        )
        .bind(&job.job_title)
        .bind(&job.job_description)
        .bind(&job.job_status)
        .bind(&job.skills_required)
        .bind(&job.attributes)
        .bind(&job.job_id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn find_job(&self, owner: i64, job_id: &str) -> RepoResult<Option<JobRow>> {
        Ok(
            sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE job_id = $1 AND user_id = $2")
                .bind(job_id)
                .bind(owner)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn find_job_by_ref(&self, job_ref: i64) -> RepoResult<Option<JobRow>> {
        Ok(sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
            .bind(job_ref)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn search_jobs_by_title(&self, owner: i64, title: &str) -> RepoResult<Vec<JobRow>> {
        Ok(sqlx::query_as::<_, JobRow>(
            r#"
            SELECT * FROM jobs
            WHERE user_id = $1 AND job_title ILIKE '%' || $2 || '%' ESCAPE '\'
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(owner)
        .bind(escape_like(title))
        .fetch_all(&self.pool)
        .await?)
    }

    async fn list_jobs_by_status(&self, owner: i64, status: &str) -> RepoResult<Vec<JobRow>> {
        Ok(sqlx::query_as::<_, JobRow>(
            r#"
            SELECT * FROM jobs
            WHERE user_id = $1 AND job_status = $2
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(owner)
        .bind(status)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn list_jobs(&self, owner: i64) -> RepoResult<Vec<JobRow>> {
        Ok(sqlx::query_as::<_, JobRow>(
            "SELECT * FROM jobs WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn delete_job(&self, owner: i64, job_id: &str) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM jobs WHERE job_id = $1 AND user_id = $2")
            .bind(job_id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
