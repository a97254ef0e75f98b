use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use importer::ImporterError;
use scoring::ScoringError;
use serde_json::{Value, json};
use std::fmt;
use storage::error::StorageError;
use validator::ValidationErrors;

/// Web layer errors
#[derive(Debug)]
pub enum WebError {
    Storage(StorageError),
    Scoring(ScoringError),
    Validation(ValidationErrors),
    /// Body, path or query string that could not be decoded.
    BadRequest(String),
    Unauthorized,
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "Storage error: {}", e),
            Self::Scoring(e) => write!(f, "{}", e),
            Self::Validation(e) => write!(f, "Validation error: {}", e),
            Self::BadRequest(reason) => write!(f, "Invalid request: {}", reason),
            Self::Unauthorized => write!(f, "Unauthorized"),
        }
    }
}

impl WebError {
    /// HTTP status and the machine-readable `code` carried in the body.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Storage(e) => storage_status(e),
            Self::Scoring(e) => match e {
                ScoringError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
                ScoringError::Locked { .. } => (StatusCode::FORBIDDEN, "locked"),
                ScoringError::ValidationFailed(_) => (StatusCode::BAD_REQUEST, "validation_failed"),
                ScoringError::ResultsUnavailable(_) => {
                    (StatusCode::SERVICE_UNAVAILABLE, "results_unavailable")
                }
                ScoringError::UpstreamRateLimited(_) => {
                    (StatusCode::SERVICE_UNAVAILABLE, "upstream_rate_limited")
                }
                ScoringError::Upstream(_) => (StatusCode::BAD_GATEWAY, "upstream_error"),
                ScoringError::Storage(e) => storage_status(e),
                ScoringError::Scheduler(_) | ScoringError::Internal(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
                }
            },
            Self::Validation(_) | Self::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, "validation_failed")
            }
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
        }
    }

    fn body(&self, status: StatusCode, code: &str) -> Value {
        if status.is_server_error() && status != StatusCode::SERVICE_UNAVAILABLE {
            tracing::error!("Request failed: {:?}", self);
            return json!({
                "error": "An internal error occurred",
                "code": code
            });
        }

        match self {
            Self::Validation(errors) => {
                let field_errors: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .flat_map(|(field, errors)| {
                        errors.iter().map(move |e| {
                            format!(
                                "{}: {}",
                                field,
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| e.code.to_string())
                            )
                        })
                    })
                    .collect();

                json!({
                    "error": "Validation failed",
                    "code": code,
                    "details": field_errors
                })
            }
            Self::Scoring(ScoringError::Locked {
                event_id,
                locked_at,
            }) => {
                json!({
                    "error": "Predictions are locked for this event",
                    "code": code,
                    "event_id": event_id,
                    "locked_at": locked_at
                })
            }
            Self::Scoring(e) if e.is_retryable() => {
                json!({
                    "error": e.to_string(),
                    "code": code,
                    "retryable": true
                })
            }
            Self::Storage(StorageError::NotFound) => {
                json!({
                    "error": "Resource not found",
                    "code": code
                })
            }
            other => {
                json!({
                    "error": other.to_string(),
                    "code": code
                })
            }
        }
    }
}

fn storage_status(error: &StorageError) -> (StatusCode, &'static str) {
    match error {
        StorageError::NotFound => (StatusCode::NOT_FOUND, "not_found"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status_code, code) = self.status_and_code();
        let body = self.body(status_code, code);

        (status_code, Json(body)).into_response()
    }
}

impl From<StorageError> for WebError {
    fn from(error: StorageError) -> Self {
        Self::Storage(error)
    }
}

impl From<ScoringError> for WebError {
    fn from(error: ScoringError) -> Self {
        Self::Scoring(error)
    }
}

impl From<ImporterError> for WebError {
    fn from(error: ImporterError) -> Self {
        Self::Scoring(ScoringError::from(error))
    }
}

impl From<ValidationErrors> for WebError {
    fn from(error: ValidationErrors) -> Self {
        Self::Validation(error)
    }
}

impl From<JsonRejection> for WebError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for WebError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for WebError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

pub type ApiResult<T> = Result<T, WebError>;
