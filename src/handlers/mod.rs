mod health;
mod metrics;
mod login;
mod status;

pub use health::health_handler;
pub use metrics::metrics_handler;
pub use login::login_handler;
pub use status::status_handler;
