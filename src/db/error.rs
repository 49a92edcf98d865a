use thiserror::Error;
use uuid::Uuid;

/// SQLSTATE raised by Postgres for a foreign key violation.
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("{resource} '{id}' cannot be changed: {reason}")]
    Conflict {
        resource: &'static str,
        id: String,
        reason: String,
    },

    #[error("{field} '{id}' does not reference an existing record")]
    MissingReference { field: &'static str, id: Uuid },
}

impl DbError {
    pub fn not_found(resource: &'static str, id: Uuid) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some(FOREIGN_KEY_VIOLATION),
        _ => false,
    }
}
