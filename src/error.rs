use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failure modes of the authentication flow. Every variant is terminal for
/// the operation that produced it; the boundary translates them into
/// user-facing responses.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("user not found")]
    NotFound,
    #[error("password verification failed")]
    BadCredentials,
    #[error("passwords do not match")]
    Mismatch,
    #[error("token expired")]
    Expired,
    #[error("token signature invalid")]
    BadSignature,
    #[error("token malformed")]
    Malformed,
    #[error("user is inactive")]
    Inactive,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    fn challenge(&self) -> bool {
        matches!(
            self,
            Self::Expired | Self::BadSignature | Self::Malformed | Self::Inactive
        )
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // NotFound and BadCredentials deliberately render the same body so a
        // caller cannot tell which half of the credential pair was wrong.
        let (status, detail) = match &self {
            Self::NotFound | Self::BadCredentials => {
                (StatusCode::UNAUTHORIZED, "Incorrect email or password")
            }
            Self::Mismatch => (StatusCode::BAD_REQUEST, "Passwords do not match"),
            Self::Expired | Self::BadSignature | Self::Malformed | Self::Inactive => {
                (StatusCode::UNAUTHORIZED, "Could not validate credentials")
            }
            Self::Internal(e) => {
                error!(error = %e, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };
        let challenge = self.challenge();
        let mut response = (status, Json(json!({ "detail": detail }))).into_response();
        if challenge {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

/// Handler-level error: either a typed auth failure or a one-off status with
/// its own detail message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("{detail}")]
    Message { status: StatusCode, detail: String },
}

impl ApiError {
    pub fn message(status: StatusCode, detail: impl Into<String>) -> Self {
        Self::Message {
            status,
            detail: detail.into(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::Auth(AuthError::Internal(e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Auth(e) => e.into_response(),
            Self::Message { status, detail } => {
                (status, Json(json!({ "detail": detail }))).into_response()
            }
        }
    }
}
