use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use roombrief_core::error::CoreError;
use roombrief_db::StoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] and [`StoreError`] and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `roombrief_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A document store error.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Store(store) => classify_store_error(store),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal()
        }
    }
}

/// Classify a store error into an HTTP status, error code, and message.
///
/// - `NotFound` maps to 404.
/// - Validation failures map to 400.
/// - Database and document decoding failures map to 500 with a sanitized
///   message.
fn classify_store_error(err: &StoreError) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("Project with id {id} not found"),
        ),
        StoreError::Validation(core) => classify_core_error(core),
        StoreError::Database(db_err) => {
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        StoreError::Serialization(e) => {
            tracing::error!(error = %e, "Stored project document could not be decoded");
            internal()
        }
    }
}
