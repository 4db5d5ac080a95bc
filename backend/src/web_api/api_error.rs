//! Terminal error mapping: every failure leaves the server as one JSON envelope.

use std::any::Any;

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use crate::{
    data_access::task_store::StoreError,
    error_body::ErrorBody,
    validation::ValidationFailure,
};

const INTERNAL_MESSAGE: &str = "Internal Server Error";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(#[from] ValidationFailure),
    /// Carries the id exactly as the client wrote it.
    #[error("Task with ID {0} not found")]
    NotFound(String),
    #[error("Route {method} {path} not found")]
    RouteNotFound { method: String, path: String },
    #[error("Method {method} not allowed on {path}")]
    MethodNotAllowed { method: String, path: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) | ApiError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing body. Store details never leave the process.
    pub fn body(&self) -> ErrorBody {
        let code = self.status().as_u16();
        match self {
            ApiError::Validation(failure) => ErrorBody {
                code,
                message: self.to_string(),
                errors: Some(failure.errors.clone()),
            },
            ApiError::Store(_) => ErrorBody::new(code, INTERNAL_MESSAGE),
            _ => ErrorBody::new(code, self.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Store(error) => tracing::error!(%error, "store failure"),
            ApiError::Validation(failure) => {
                tracing::debug!(errors = ?failure.errors, "rejected input")
            }
            _ => tracing::debug!(error = %self, "request failed"),
        }
        (self.status(), Json(self.body())).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(ValidationFailure::single("", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(ValidationFailure::single("", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(ValidationFailure::single("id", rejection.body_text()))
    }
}

/// Used by `CatchPanicLayer`: a panicking handler still answers with the 500 envelope.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(detail, "handler panicked");

    let status = StatusCode::INTERNAL_SERVER_ERROR;
    (status, Json(ErrorBody::new(status.as_u16(), INTERNAL_MESSAGE))).into_response()
}
