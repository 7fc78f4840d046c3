use lazy_static::lazy_static;
use prometheus::{Counter, Gauge, register_counter, register_gauge};


lazy_static! {
    pub static ref LOGIN_ATTEMPTS: Counter =
        register_counter!("login_attempts_total", "Total number of login requests").unwrap();
    pub static ref LOGIN_THROTTLED: Counter =
        register_counter!("login_throttled_total", "Login requests rejected by the rate limiter").unwrap();
    pub static ref LOGIN_FAILURES: Counter =
        register_counter!("login_failures_total", "Login requests with invalid credentials").unwrap();
    pub static ref LOGIN_SUCCESS: Counter =
        register_counter!("login_success_total", "Successful logins").unwrap();
    pub static ref RATE_LIMIT_BLOCKS: Counter =
        register_counter!("rate_limit_blocks_total", "Identifiers moved into a block").unwrap();
    pub static ref RATE_LIMIT_ENTRIES: Gauge =
        register_gauge!("rate_limit_entries", "Current number of tracked identifiers").unwrap();
}
