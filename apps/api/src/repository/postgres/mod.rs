//! PostgreSQL implementations of the repository traits, one file per table.

mod application_forms;
mod form_templates;
mod jobs;
mod submissions;
mod users;

use sqlx::PgPool;

use super::RepositoryError;

#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Unique violations become `Conflict` carrying the constraint name.
fn map_write_error(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict {
                constraint: db_err.constraint().unwrap_or_default().to_string(),
            };
        }
    }
    RepositoryError::Database(err)
}

/// Escapes LIKE metacharacters so user input matches literally.
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
