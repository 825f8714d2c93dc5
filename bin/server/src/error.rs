//! Error types for the HTTP API.
//!
//! Service operations return `Report<ApiError>`. The report's current
//! context decides the response status; collaborator failures are logged
//! with their full report and answered with a generic message.

use almanac_scheduler::ScheduleError;
use almanac_session::TruncateError;
use almanac_workflow::ResolveError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rootcause::Report;
use serde::Serialize;
use std::fmt;

/// Errors surfaced by the workflow API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request carried a missing or malformed argument.
    InvalidArgument { message: String },
    /// The requested entity does not exist in the caller's site.
    NotFound { message: String },
    /// A collaborator (store or scheduler) failed.
    Collaborator { message: String },
}

impl ApiError {
    /// Creates an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Returns the HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidArgument { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Collaborator { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument { message } => write!(f, "invalid argument: {message}"),
            Self::NotFound { message } => write!(f, "not found: {message}"),
            Self::Collaborator { message } => write!(f, "collaborator failure: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        let message = err.to_string();
        match err {
            ResolveError::MissingParameter { .. } => Self::InvalidArgument { message },
            ResolveError::NotFound { .. } => Self::NotFound { message },
            ResolveError::Store(_) => Self::Collaborator { message },
        }
    }
}

impl From<TruncateError> for ApiError {
    fn from(err: TruncateError) -> Self {
        let message = err.to_string();
        if err.is_invalid_argument() {
            Self::InvalidArgument { message }
        } else {
            Self::Collaborator { message }
        }
    }
}

impl From<ScheduleError> for ApiError {
    fn from(err: ScheduleError) -> Self {
        Self::Collaborator {
            message: err.to_string(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

/// An error report on its way to becoming an HTTP response.
#[derive(Debug)]
pub struct HttpError(pub Report<ApiError>);

impl From<Report<ApiError>> for HttpError {
    fn from(report: Report<ApiError>) -> Self {
        Self(report)
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let context = self.0.current_context();
        let status = context.status();
        let message = match context {
            ApiError::InvalidArgument { message } | ApiError::NotFound { message } => {
                message.clone()
            }
            ApiError::Collaborator { .. } => {
                tracing::error!(error = %self.0, "request failed");
                "internal server error".to_string()
            }
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}
