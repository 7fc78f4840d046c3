mod auth;
mod clock;
mod config;
mod error;
mod handlers;
mod metrics;
mod middleware;
mod models;
mod rate_limit;
mod routes;
mod state;
mod sweeper;

use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::auth::StaticAuthenticator;
use crate::clock::{Clock, SystemClock};
use crate::config::Args;
use crate::rate_limit::RateLimiter;
use crate::state::AppState;

// Used when RUST_LOG is unset
const DEFAULT_LOG_FILTER: &str = "admin_login_gate=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // parse cli arguments
    let args = Args::parse();
    let rate_config = args.rate_limit_config()?;
    let authenticator = StaticAuthenticator::new(
        args.admin_email.as_deref(),
        args.admin_password_hash.as_deref(),
    )?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let limiter = Arc::new(RateLimiter::new(rate_config, clock.clone()));

    // creating shared state
    let state = Arc::new(AppState {
        limiter: limiter.clone(),
        authenticator: Arc::new(authenticator),
        clock,
    });

    // spawn the background sweeper
    if let Some(sweep_interval) = args.sweep_interval() {
        tokio::spawn(sweeper::sweeper(limiter, sweep_interval));
    }

    let app = routes::build_router(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Login gate running on http://localhost:{}", args.port);
    tracing::info!(
        max_attempts = rate_config.max_attempts,
        window_secs = args.window_secs,
        block_secs = args.block_secs,
        "Login rate limit configured"
    );
    axum::serve(listener, app).await?;

    Ok(())
}
