//! Typed errors and HTTP mapping.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing setting: {0}")]
    Missing(&'static str),
    #[error("invalid setting {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
    #[error("schema file {0}: {1}")]
    Schema(String, String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("validation: {0}")]
    Validation(String),
    #[error("referential: {0}")]
    Referential(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("deadline exceeded")]
    Timeout,
    #[error("database: {0}")]
    Db(sqlx::Error),
}

const FOREIGN_KEY_VIOLATION: &str = "23503";
const UNIQUE_VIOLATION: &str = "23505";
const CHECK_VIOLATION: &str = "23514";

impl AppError {
    /// Classify a store error by SQLSTATE so constraint failures surface as client errors.
    pub fn from_db(e: sqlx::Error) -> Self {
        if let sqlx::Error::RowNotFound = e {
            return AppError::NotFound("row not found".into());
        }
        if let sqlx::Error::Database(ref db) = e {
            let classified = match db.code().as_deref() {
                Some(FOREIGN_KEY_VIOLATION) => {
                    Some(AppError::Referential("engine reference is missing or still in use".into()))
                }
                Some(UNIQUE_VIOLATION) => Some(AppError::Conflict("record already exists".into())),
                Some(CHECK_VIOLATION) => {
                    Some(AppError::Validation("value rejected by a storage constraint".into()))
                }
                _ => None,
            };
            if let Some(err) = classified {
                // Constraint and table names stay in the log.
                tracing::warn!(code = ?db.code(), constraint = ?db.constraint(), message = %db.message(), "constraint violation");
                return err;
            }
        }
        AppError::Db(e)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Referential(_) => StatusCode::CONFLICT,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            AppError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "config_error",
            AppError::NotFound(_) => "not_found",
            AppError::Validation(_) => "validation_error",
            AppError::Referential(_) => "referential_error",
            AppError::Conflict(_) => "conflict",
            AppError::BadRequest(_) => "bad_request",
            AppError::Timeout => "timeout",
            AppError::Db(_) => "database_error",
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::from_db(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::BadRequest(e.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::BadRequest(e.body_text())
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Db(e) => {
                tracing::error!(error = %e, "storage error");
                "internal storage error".to_string()
            }
            AppError::Config(e) => {
                tracing::error!(error = %e, "configuration error");
                "internal error".to_string()
            }
            other => other.to_string(),
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code().to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_4xx() {
        assert_eq!(AppError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Referential("x".into()).status(), StatusCode::CONFLICT);
    }

    #[test]
    fn storage_errors_map_to_5xx() {
        let err = AppError::from_db(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, AppError::Db(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(AppError::Timeout.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn row_not_found_becomes_not_found() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[derive(Debug)]
    struct Violation(&'static str);

    impl std::fmt::Display for Violation {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.message_text())
        }
    }

    impl Violation {
        fn message_text(&self) -> &'static str {
            "insert or update on table \"cars\" violates constraint \"cars_engine_id_fkey\""
        }
    }

    impl std::error::Error for Violation {}

    impl sqlx::error::DatabaseError for Violation {
        fn message(&self) -> &str {
            self.message_text()
        }

        fn code(&self) -> Option<std::borrow::Cow<'_, str>> {
            Some(std::borrow::Cow::Borrowed(self.0))
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            sqlx::error::ErrorKind::Other
        }
    }

    fn violation(code: &'static str) -> AppError {
        AppError::from_db(sqlx::Error::Database(Box::new(Violation(code))))
    }

    #[test]
    fn sqlstate_codes_are_classified() {
        assert!(matches!(violation(FOREIGN_KEY_VIOLATION), AppError::Referential(_)));
        assert!(matches!(violation(UNIQUE_VIOLATION), AppError::Conflict(_)));
        assert!(matches!(violation(CHECK_VIOLATION), AppError::Validation(_)));
        assert!(matches!(violation("40001"), AppError::Db(_)));
    }

    #[test]
    fn constraint_names_never_reach_the_client() {
        for code in [FOREIGN_KEY_VIOLATION, UNIQUE_VIOLATION, CHECK_VIOLATION] {
            let text = violation(code).to_string();
            assert!(!text.contains("cars_engine_id_fkey"), "{}", text);
            assert!(!text.contains("table"), "{}", text);
        }
    }

    #[tokio::test]
    async fn storage_error_body_hides_details() {
        let resp = AppError::from_db(sqlx::Error::PoolClosed).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = http_body_util::BodyExt::collect(resp.into_body())
            .await
            .unwrap()
            .to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "database_error");
        assert_eq!(body["error"]["message"], "internal storage error");
    }
}
