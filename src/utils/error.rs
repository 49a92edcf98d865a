use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::db::DbError;
use crate::models::ValidationError;
use crate::utils::response::error as error_response;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// A write failed and was rolled back. `message` is shown to the user.
    #[error("{message}")]
    Transient {
        message: String,
        #[source]
        source: DbError,
    },

    #[error("Database error")]
    DatabaseError(#[source] DbError),

    #[error("Internal server error")]
    InternalServerError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::AuthError(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Transient { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::AuthError(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::MethodNotAllowed(_) => "METHOD_NOT_ALLOWED",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Transient { .. } => "INTERNAL_SERVER_ERROR",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Map a failed write. Not-found, conflict and dangling references keep
    /// their own status; anything else becomes a transient failure carrying
    /// `message` for the user.
    pub fn from_write(err: DbError, message: impl Into<String>) -> Self {
        match err {
            DbError::Sqlx(_) => AppError::Transient {
                message: message.into(),
                source: err,
            },
            other => other.into(),
        }
    }

    /// The error page for a status produced outside our handlers, such as an
    /// unmatched method or a rejected request body.
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => AppError::AuthError("Authentication is required".into()),
            StatusCode::FORBIDDEN => {
                AppError::Forbidden("You are not allowed to access this resource".into())
            }
            StatusCode::NOT_FOUND => AppError::NotFound("The requested page does not exist".into()),
            StatusCode::METHOD_NOT_ALLOWED => {
                AppError::MethodNotAllowed("This method is not supported for this page".into())
            }
            StatusCode::CONFLICT => AppError::Conflict("The request conflicts with stored data".into()),
            s if s.is_client_error() => {
                AppError::ValidationError("The submitted request could not be processed".into())
            }
            _ => AppError::InternalServerError("Something went wrong".into()),
        }
    }

    fn log(&self) {
        match self {
            AppError::ValidationError(msg)
            | AppError::AuthError(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::MethodNotAllowed(msg)
            | AppError::Conflict(msg) => {
                warn!(code = self.code(), message = %msg, "Request rejected");
            }
            AppError::Transient { message, source } => {
                error!(error = ?source, message = %message, "Write rolled back");
            }
            AppError::DatabaseError(e) => {
                error!(error = ?e, "Database error");
            }
            AppError::InternalServerError(msg) => {
                error!(message = %msg, "Internal error");
            }
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { resource, id } => {
                AppError::NotFound(format!("{} with id '{}' was not found", resource, id))
            }
            DbError::Conflict { .. } => AppError::Conflict(err.to_string()),
            DbError::MissingReference { .. } => AppError::ValidationError(err.to_string()),
            DbError::Sqlx(_) => AppError::DatabaseError(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        // Log internal details
        self.log();

        // Only expose high-level message to the client
        let public_message = match &self {
            AppError::ValidationError(msg)
            | AppError::AuthError(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::MethodNotAllowed(msg)
            | AppError::Conflict(msg)
            | AppError::InternalServerError(msg) => msg.clone(),
            AppError::Transient { message, .. } => message.clone(),
            AppError::DatabaseError(_) => "A database error occurred".to_string(),
        };

        error_response(code, public_message, None, status)
    }
}

/// Give bodiless error responses (unmatched methods, extractor rejections)
/// the same JSON error page as handler errors.
pub async fn normalize_error_pages(response: Response) -> Response {
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/json"))
        .unwrap_or(false);
    if is_json {
        return response;
    }

    AppError::from_status(status).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use serde_json::Value;
    use uuid::Uuid;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn status_codes_are_distinct_per_page() {
        let cases = [
            (AppError::AuthError("x".into()), 401),
            (AppError::Forbidden("x".into()), 403),
            (AppError::NotFound("x".into()), 404),
            (AppError::MethodNotAllowed("x".into()), 405),
            (AppError::Conflict("x".into()), 409),
            (AppError::ValidationError("x".into()), 422),
            (AppError::InternalServerError("x".into()), 500),
        ];
        for (err, status) in cases {
            assert_eq!(err.status_code().as_u16(), status, "{}", err.code());
        }
    }

    #[test]
    fn db_not_found_maps_to_404() {
        let err: AppError = DbError::not_found("venue", Uuid::nil()).into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn missing_reference_is_a_validation_failure() {
        let err: AppError = DbError::MissingReference {
            field: "artist_id",
            id: Uuid::nil(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn write_failures_keep_conflicts() {
        let conflict = DbError::Conflict {
            resource: "artist",
            id: "x".into(),
            reason: "booked".into(),
        };
        let err = AppError::from_write(conflict, "unused");
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn transient_failure_shows_user_message_only() {
        let err = AppError::from_write(
            DbError::Sqlx(sqlx::Error::PoolTimedOut),
            "An error occurred. Venue X could not be listed.",
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(
            body["error"]["message"],
            "An error occurred. Venue X could not be listed."
        );
    }

    #[tokio::test]
    async fn database_error_hides_details() {
        let response = AppError::DatabaseError(DbError::Sqlx(sqlx::Error::PoolClosed)).into_response();
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "DATABASE_ERROR");
        assert_eq!(body["error"]["message"], "A database error occurred");
    }

    #[tokio::test]
    async fn bodiless_errors_are_rewritten() {
        let raw = Response::builder()
            .status(StatusCode::METHOD_NOT_ALLOWED)
            .body(Body::empty())
            .unwrap();
        let response = normalize_error_pages(raw).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body_json(response).await["error"]["code"], "METHOD_NOT_ALLOWED");
    }

    #[tokio::test]
    async fn rejected_bodies_become_validation_errors() {
        let raw = Response::builder()
            .status(StatusCode::UNSUPPORTED_MEDIA_TYPE)
            .body(Body::from("Expected request with `Content-Type: application/x-www-form-urlencoded`"))
            .unwrap();
        let response = normalize_error_pages(raw).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn success_responses_pass_through() {
        let raw = Response::builder()
            .status(StatusCode::OK)
            .body(Body::from("ok"))
            .unwrap();
        let response = normalize_error_pages(raw).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
