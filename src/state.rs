use std::sync::Arc;
use crate::auth::Authenticator;
use crate::clock::Clock;
use crate::rate_limit::RateLimiter;
// app's shared state

pub struct AppState {
    pub limiter: Arc<RateLimiter>,
    pub authenticator: Arc<dyn Authenticator>,
    pub clock: Arc<dyn Clock>, // same clock the limiter reads
}
