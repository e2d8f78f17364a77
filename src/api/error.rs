use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::enrollment::EnrollmentError;
use crate::mail::MailError;
use crate::payments::{GatewayError, SignatureError};

/// Failure returned by a handler. Rendered as `{"success": false, "message": ...}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(&'static str),

    #[error("Invalid request body")]
    InvalidBody(#[from] JsonRejection),

    #[error("unauthorized")]
    Unauthorized,

    #[error("{0}")]
    NotFound(&'static str),

    #[error("Student is already Enrolled")]
    AlreadyEnrolled,

    #[error("Payment Failed")]
    Signature(#[from] SignatureError),

    #[error("Could not initiate order.")]
    Gateway(#[from] GatewayError),

    #[error("Could not send email")]
    Mail(#[from] MailError),

    #[error("internal server error")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::InvalidBody(_) | AppError::Signature(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyEnrolled => StatusCode::CONFLICT,
            AppError::Gateway(_) | AppError::Mail(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<EnrollmentError> for AppError {
    fn from(err: EnrollmentError) -> Self {
        match err {
            EnrollmentError::CourseNotFound(_) => AppError::NotFound("Course not found"),
            EnrollmentError::UserNotFound(_) => AppError::NotFound("User not found"),
            EnrollmentError::AlreadyEnrolled { .. } => AppError::AlreadyEnrolled,
            EnrollmentError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::InvalidBody(e) => tracing::debug!(error = %e.body_text(), "rejected request body"),
            AppError::Signature(e) => tracing::warn!(error = %e, "payment signature rejected"),
            AppError::Gateway(e) => tracing::error!(error = %e, "payment gateway call failed"),
            AppError::Mail(e) => tracing::error!(error = %e, "mail delivery failed"),
            AppError::Database(e) => tracing::error!(error = %e, "database error"),
            _ => {}
        }

        (
            status,
            Json(json!({
                "success": false,
                "message": self.to_string(),
            })),
        )
            .into_response()
    }
}
