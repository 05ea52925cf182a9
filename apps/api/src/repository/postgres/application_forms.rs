use async_trait::async_trait;
use uuid::Uuid;

use super::{map_write_error, PgRepository};
use crate::models::application_form::{ApplicationFormRow, FormStatus, NewApplicationForm};
use crate::repository::{ApplicationFormRepository, RepoResult};

#[async_trait]
impl ApplicationFormRepository for PgRepository {
    async fn insert_form(&self, form: NewApplicationForm) -> RepoResult<ApplicationFormRow> {
        sqlx::query_as::<_, ApplicationFormRow>(
            r#"
            INSERT INTO application_form
                (form_uuid, job_ref, form_template_ref, status, date_created)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(form.form_uuid)
        .bind(form.job_ref)
        .bind(form.form_template_ref)
        .bind(form.status.as_str())
        .bind(form.date_created)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn find_form(&self, form_uuid: Uuid) -> RepoResult<Option<ApplicationFormRow>> {
        Ok(sqlx::query_as::<_, ApplicationFormRow>(
            "SELECT * FROM application_form WHERE form_uuid = $1",
        )
        .bind(form_uuid)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_forms_for_job(&self, job_ref: i64) -> RepoResult<Vec<ApplicationFormRow>> {
        Ok(sqlx::query_as::<_, ApplicationFormRow>(
            "SELECT * FROM application_form WHERE job_ref = $1 ORDER BY date_created DESC",
        )
        .bind(job_ref)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn update_form_status(
        &self,
        form_uuid: Uuid,
        status: FormStatus,
    ) -> RepoResult<Option<ApplicationFormRow>> {
        Ok(sqlx::query_as::<_, ApplicationFormRow>(
            "UPDATE application_form SET status = $1 WHERE form_uuid = $2 RETURNING *",
        )
        .bind(status.as_str())
        .bind(form_uuid)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_form(&self, form_uuid: Uuid) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM application_form WHERE form_uuid = $1")
            .bind(form_uuid)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
