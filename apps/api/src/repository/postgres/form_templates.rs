use async_trait::async_trait;

use super::{map_write_error, PgRepository};
use crate::models::form_template::{FormTemplateInput, FormTemplateRow};
use crate::repository::{FormTemplateRepository, RepoResult};

#[async_trait]
impl FormTemplateRepository for PgRepository {
    async fn insert_template(
        &self,
        owner: i64,
        template: &FormTemplateInput,
    ) -> RepoResult<FormTemplateRow> {
        sqlx::query_as::<_, FormTemplateRow>(
            r#"
            INSERT INTO form_templates (form_template_id, user_id, fields)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&template.form_template_id)
        .bind(owner)
        .bind(&template.fields)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn update_template(
        &self,
        owner: i64,
        template: &FormTemplateInput,
    ) -> RepoResult<Option<FormTemplateRow>> {
        Ok(sqlx::query_as::<_, FormTemplateRow>(
            r#"
            UPDATE form_templates SET fields = $1, updated_at = NOW()
            WHERE form_template_id = $2 AND user_id = $3
            RETURNING *
            "#,
        )
        .bind(&template.fields)
        .bind(&template.form_template_id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn find_template(
        &self,
        owner: i64,
        form_template_id: &str,
    ) -> RepoResult<Option<FormTemplateRow>> {
        Ok(sqlx::query_as::<_, FormTemplateRow>(
            "SELECT * FROM form_templates WHERE form_template_id = $1 AND user_id = $2",
        )
        .bind(form_template_id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn find_template_by_ref(
        &self,
        template_ref: i64,
    ) -> RepoResult<Option<FormTemplateRow>> {
        Ok(
            sqlx::query_as::<_, FormTemplateRow>("SELECT * FROM form_templates WHERE id = $1")
                .bind(template_ref)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn list_templates(&self, owner: i64) -> RepoResult<Vec<FormTemplateRow>> {
        Ok(sqlx::query_as::<_, FormTemplateRow>(
            "SELECT * FROM form_templates WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn delete_template(&self, owner: i64, form_template_id: &str) -> RepoResult<bool> {
        let result =
            sqlx::query("DELETE FROM form_templates WHERE form_template_id = $1 AND user_id = $2")
                .bind(form_template_id)
                .bind(owner)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
