use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::auth::jwt::TokenError;
use crate::auth::password::PasswordError;
use crate::users::repo::StoreError;

/// Which credential check failed during login. Internal only: both faults
/// render the same client response so account existence cannot be probed
/// through the error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialFault {
    UnknownEmail,
    WrongPassword,
}

/// Terminal request failure. Every handler error converges here; the
/// `Display` string is the client-facing message and nothing else is ever
/// serialized into the body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid inputs passed, please check your data.")]
    Validation,

    #[error("User exists, already, please login instead")]
    DuplicateAccount,

    #[error("Invalid credentials, could not log you in.")]
    InvalidCredentials(CredentialFault),

    #[error("{message}")]
    StoreUnavailable {
        message: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("Could not create user, please try again.")]
    HashingUnavailable(#[source] PasswordError),

    #[error("Something went wrong when trying to log you in, please check your credentials and try again.")]
    CredentialCheckFailed(#[source] PasswordError),

    #[error("Signing up failed, please try again")]
    AccountCreationFailed(#[source] anyhow::Error),

    #[error("Signing up failed, please try again")]
    UploadFailed(#[source] anyhow::Error),

    #[error("Logging in failed, please try again")]
    AuthFailed(#[source] TokenError),

    #[error("Could not find this route")]
    RouteNotFound,

    #[error("An unknown error occurred!")]
    Internal(#[source] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation | ApiError::DuplicateAccount => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidCredentials(_) => StatusCode::FORBIDDEN,
            ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::StoreUnavailable { .. }
            | ApiError::HashingUnavailable(_)
            | ApiError::CredentialCheckFailed(_)
            | ApiError::AccountCreationFailed(_)
            | ApiError::UploadFailed(_)
            | ApiError::AuthFailed(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::InvalidCredentials(fault) => warn!(?fault, "login rejected"),
            _ if status.is_server_error() => error!(error = ?self, "request failed"),
            _ => warn!(error = %self, "request rejected"),
        }
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}
