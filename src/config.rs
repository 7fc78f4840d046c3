use clap::Parser;
use std::time::Duration;

use crate::error::ConfigError;
use crate::rate_limit::RateLimitConfig;

// CLI argument structure, every option can also come from the environment
#[derive(Parser, Debug, Clone)]
#[command(name = "admin-login-gate")]
#[command(about = "Admin login endpoint with brute-force throttling")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    // Window in which login attempts are counted, in seconds
    #[arg(long, env = "LOGIN_WINDOW_SECS", default_value_t = 900)]
    pub window_secs: u64,

    // Attempts allowed per window before the identifier is blocked
    #[arg(long, env = "LOGIN_MAX_ATTEMPTS", default_value_t = 5)]
    pub max_attempts: u32,

    // Block penalty once max attempts is reached, in seconds
    #[arg(long, env = "LOGIN_BLOCK_SECS", default_value_t = 3600)]
    pub block_secs: u64,

    // How often expired entries are swept, 0 turns the sweeper off
    #[arg(long, env = "LOGIN_SWEEP_INTERVAL_SECS", default_value_t = 300)]
    pub sweep_interval: u64,

    // Admin account email
    #[arg(long, env = "ADMIN_EMAIL")]
    pub admin_email: Option<String>,

    // Argon2 hash of the admin password in PHC format
    #[arg(long, env = "ADMIN_PASSWORD_HASH", hide_env_values = true)]
    pub admin_password_hash: Option<String>,
}

impl Args {
    pub fn rate_limit_config(&self) -> Result<RateLimitConfig, ConfigError> {
        RateLimitConfig::new(
            self.max_attempts,
            Duration::from_secs(self.window_secs),
            Duration::from_secs(self.block_secs),
        )
    }

    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval > 0).then(|| Duration::from_secs(self.sweep_interval))
    }
}
