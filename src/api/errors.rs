use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::api::dto::ErrorResponse;
use crate::domain::RiskViolation;
use crate::services::JournalError;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Rejected(RiskViolation),
    InternalError(String),
}

impl From<JournalError> for ApiError {
    fn from(err: JournalError) -> Self {
        match err {
            JournalError::Rejected(violation) => ApiError::Rejected(violation),
            JournalError::Store(e) => ApiError::InternalError(format!("{:#}", e)),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<RiskViolation> for ApiError {
    fn from(violation: RiskViolation) -> Self {
        ApiError::Rejected(violation)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("bad_request", message),
            ),
            ApiError::Rejected(violation) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse {
                    error: "rejected".to_string(),
                    message: violation.to_string(),
                    violation: Some(violation),
                },
            ),
            ApiError::InternalError(message) => {
                error!("Internal error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("internal_error", message),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
