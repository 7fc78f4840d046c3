use axum::{Json, extract::{Query, State}};
use std::sync::Arc;

use crate::models::{StatusQuery, identifier_for};
use crate::rate_limit::RateLimitStatus;
use crate::state::AppState;

// Lets the login form warn before an attempt is spent
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatusQuery>,
) -> Json<RateLimitStatus> {
    Json(state.limiter.peek_status(&identifier_for(&query.email)))
}
