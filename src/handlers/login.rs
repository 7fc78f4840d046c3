use axum::{Json, extract::State};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::AppError;
use crate::metrics::{LOGIN_ATTEMPTS, LOGIN_FAILURES, LOGIN_SUCCESS, LOGIN_THROTTLED, RATE_LIMIT_ENTRIES};
use crate::models::{LoginRequest, LoginResponse, identifier_for};
use crate::state::AppState;

// Throttle first, only then check credentials
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    LOGIN_ATTEMPTS.inc();

    if payload.password.is_empty() {
        return Err(AppError::BadRequest("Password is required".to_string()));
    }

    let identifier = identifier_for(&payload.email);
    let outcome = state.limiter.record_attempt(&identifier);
    RATE_LIMIT_ENTRIES.set(state.limiter.entry_count() as f64);

    if !outcome.allowed {
        LOGIN_THROTTLED.inc();
        // round up so waiting the advertised time always lands at or past reset_at
        let millis = (outcome.reset_at - state.clock.now()).num_milliseconds();
        let retry_after = ((millis + 999) / 1000).max(1) as u64;
        warn!(identifier = %identifier, retry_after, "Login throttled");
        return Err(AppError::Throttled {
            reset_at: outcome.reset_at,
            retry_after,
        });
    }

    // argon2 is CPU-heavy, keep it off the async workers
    let authenticator = state.authenticator.clone();
    let LoginRequest { email, password } = payload;
    let valid = tokio::task::spawn_blocking(move || authenticator.verify(&email, &password))
        .await
        .map_err(anyhow::Error::from)?;

    if !valid {
        LOGIN_FAILURES.inc();
        warn!(
            identifier = %identifier,
            remaining = outcome.remaining_attempts,
            "Failed login attempt"
        );
        return Err(AppError::InvalidCredentials {
            remaining_attempts: outcome.remaining_attempts,
            reset_at: outcome.reset_at,
        });
    }

    state.limiter.reset(&identifier);
    RATE_LIMIT_ENTRIES.set(state.limiter.entry_count() as f64);
    LOGIN_SUCCESS.inc();
    info!(identifier = %identifier, "Login succeeded");

    Ok(Json(LoginResponse {
        success: true,
        email: identifier,
    }))
}
