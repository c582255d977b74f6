use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::{
    auth::{
        dto::{ErrorResponse, ValidationErrorResponse},
        validation::FieldError,
    },
    store::StoreError,
};

pub const MSG_USERNAME_TAKEN: &str = "Username already exists";
pub const MSG_INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const MSG_SERVER_ERROR: &str = "Server error";

/// Everything a request can fail with, mapped to a status and JSON body in one place.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("username already exists")]
    UsernameTaken,

    /// Unknown user and wrong password are deliberately the same variant.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::UsernameTaken => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            Self::Validation(errors) => {
                (status, Json(ValidationErrorResponse { errors })).into_response()
            }
            Self::UsernameTaken => (
                status,
                Json(ErrorResponse {
                    error: MSG_USERNAME_TAKEN,
                }),
            )
                .into_response(),
            Self::InvalidCredentials => (
                status,
                Json(ErrorResponse {
                    error: MSG_INVALID_CREDENTIALS,
                }),
            )
                .into_response(),
            other => {
                // detail goes to the log only
                error!(error = %other, "request failed");
                (
                    status,
                    Json(ErrorResponse {
                        error: MSG_SERVER_ERROR,
                    }),
                )
                    .into_response()
            }
        }
    }
}
