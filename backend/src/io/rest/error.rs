//! Error type for the REST layer and its mapping to HTTP responses.
//!
//! Every failure on the account routes ends up here, so this is the only
//! place where errors are translated into status codes.

use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::ErrorResponse;
use thiserror::Error;
use tracing::{error, warn};

use crate::domain::DomainError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body is not a JSON account
    #[error("invalid body")]
    InvalidBody,

    /// Body and path disagree on the account id
    #[error("inconsistent account id")]
    InconsistentId,

    /// Path or query string could not be extracted
    #[error("invalid request")]
    InvalidRequest,

    #[error("Account not found")]
    NotFound,

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody | ApiError::InconsistentId | ApiError::InvalidRequest => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound => ApiError::NotFound,
            DomainError::Storage(e) => ApiError::Internal(e),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        warn!("Path rejected: {}", rejection.body_text());
        ApiError::InvalidRequest
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        warn!("Query string rejected: {}", rejection.body_text());
        ApiError::InvalidRequest
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {:?}", self);
        } else {
            warn!("Request rejected ({}): {}", status.as_u16(), self);
        }

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}
