use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("max attempts must be at least 1")]
    ZeroMaxAttempts,

    #[error("{0} must be longer than zero")]
    ZeroDuration(&'static str),

    #[error("{0} is too long")]
    DurationTooLong(&'static str),

    #[error("admin password hash is not a valid PHC string: {0}")]
    InvalidPasswordHash(String),

    #[error("admin email and password hash must be set together")]
    IncompleteAdminCredentials,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    // Same message whether or not the email exists
    #[error("Invalid email or password")]
    InvalidCredentials {
        remaining_attempts: u32,
        reset_at: DateTime<Utc>,
    },

    #[error("Too many login attempts. Try again later.")]
    Throttled {
        reset_at: DateTime<Utc>,
        retry_after: u64,
    },

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    remaining_attempts: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reset_at: Option<DateTime<Utc>>,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials { .. } => StatusCode::UNAUTHORIZED,
            AppError::Throttled { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal(err) = &self {
            // Log the real error server-side, return generic message to client
            tracing::error!("Internal error: {:#}", err);
        }

        let status = self.status_code();
        let (remaining_attempts, reset_at) = match &self {
            AppError::InvalidCredentials {
                remaining_attempts,
                reset_at,
            } => (Some(*remaining_attempts), Some(*reset_at)),
            AppError::Throttled { reset_at, .. } => (Some(0), Some(*reset_at)),
            _ => (None, None),
        };

        let body = ErrorBody {
            success: false,
            error: self.to_string(),
            remaining_attempts,
            reset_at,
        };

        let mut response = (status, axum::Json(body)).into_response();

        if let AppError::Throttled { retry_after, .. } = self {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
        }

        response
    }
}
