//! # HTTP errors
//!
//! Every failure is answered with `{"detail": "..."}` carrying the underlying text.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sales::SalesError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Caller input rejected by the database (order registration)
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// Body or path that could not be extracted; keeps the extractor's status
    #[error("{detail}")]
    InvalidRequest { status: StatusCode, detail: String },

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Get HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest { status, .. } => *status,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Reports, views, updates and deletes: absence is 404 where the operation treats it as
    /// exceptional, anything else is a 500.
    #[must_use]
    pub fn backend(err: SalesError) -> Self {
        match err {
            SalesError::CustomerNotFound(_) => ApiError::NotFound(err.to_string()),
            SalesError::Db(db) => ApiError::Internal(db.to_string()),
        }
    }

    /// Failures of the history procedure.
    #[must_use]
    pub fn procedure(err: SalesError) -> Self {
        ApiError::Internal(format!("Error en SP: {err}"))
    }

    /// Failures of order registration count as bad input.
    #[must_use]
    pub fn registration(err: SalesError) -> Self {
        ApiError::BadRequest(format!("Error al registrar: {err}"))
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "{self}");
        } else {
            tracing::warn!(status = status.as_u16(), "{self}");
        }
        let body = Json(ErrorResponse {
            detail: self.to_string(),
        });
        (status, body).into_response()
    }
}
