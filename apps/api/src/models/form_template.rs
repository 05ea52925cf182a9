use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FormTemplateRow {
    #[serde(skip_serializing)]
    pub id: i64,
    pub form_template_id: String,
    #[serde(skip_serializing)]
    pub user_id: i64,
    /// JSON array of field descriptor objects, stored as-is.
    pub fields: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormTemplateInput {
    pub form_template_id: String,
    pub fields: Value,
}
