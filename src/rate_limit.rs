use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::error::ConfigError;
use crate::metrics::RATE_LIMIT_BLOCKS;

// Longest window or block we accept, keeps timestamp arithmetic in range
const MAX_DURATION_DAYS: i64 = 366;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub max_attempts: u32,
    pub window: Duration,
    pub block_duration: Duration,
}

impl RateLimitConfig {
    pub fn new(
        max_attempts: u32,
        window: std::time::Duration,
        block_duration: std::time::Duration,
    ) -> Result<Self, ConfigError> {
        if max_attempts == 0 {
            return Err(ConfigError::ZeroMaxAttempts);
        }
        Ok(Self {
            max_attempts,
            window: to_delta("window", window)?,
            block_duration: to_delta("block duration", block_duration)?,
        })
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            window: Duration::minutes(15),
            block_duration: Duration::minutes(60),
        }
    }
}

fn to_delta(name: &'static str, value: std::time::Duration) -> Result<Duration, ConfigError> {
    if value.is_zero() {
        return Err(ConfigError::ZeroDuration(name));
    }
    match Duration::from_std(value) {
        Ok(delta) if delta <= Duration::days(MAX_DURATION_DAYS) => Ok(delta),
        _ => Err(ConfigError::DurationTooLong(name)),
    }
}

// Rate limit entry - tracks attempts per identifier.
// While blocked, window_reset_at holds the block expiry and count stays frozen.
#[derive(Debug, Clone)]
pub struct RateLimitEntry {
    pub count: u32,
    pub window_reset_at: DateTime<Utc>,
    pub blocked: bool,
}

impl RateLimitEntry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.window_reset_at
    }
}

// Result of recording an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptOutcome {
    pub allowed: bool,
    pub remaining_attempts: u32,
    pub reset_at: DateTime<Utc>,
}

impl AttemptOutcome {
    fn allowed(remaining_attempts: u32, reset_at: DateTime<Utc>) -> Self {
        Self {
            allowed: true,
            remaining_attempts,
            reset_at,
        }
    }

    fn denied(reset_at: DateTime<Utc>) -> Self {
        Self {
            allowed: false,
            remaining_attempts: 0,
            reset_at,
        }
    }
}

// Read-only view used for UI warnings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitStatus {
    pub remaining_attempts: u32,
    pub reset_at: DateTime<Utc>,
    pub blocked: bool,
}

/// Fixed-window attempt limiter with escalation to a block.
///
/// Expired entries are dropped lazily when the identifier is next recorded,
/// or by [`RateLimiter::sweep_expired`].
pub struct RateLimiter {
    entries: DashMap<String, RateLimitEntry>,
    config: RateLimitConfig,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            config,
            clock,
        }
    }

    // Record one attempt. The entry guard is held for the whole
    // read-increment-compare-write sequence so same-key callers serialize.
    pub fn record_attempt(&self, identifier: &str) -> AttemptOutcome {
        let now = self.clock.now();
        let max_attempts = self.config.max_attempts;

        match self.entries.entry(identifier.to_string()) {
            Entry::Vacant(vacant) => {
                let entry = vacant.insert(self.fresh_entry(now));
                debug!(identifier, "first attempt in new window");
                AttemptOutcome::allowed(max_attempts - 1, entry.window_reset_at)
            }
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();

                // window or block over: start again as if the entry never existed
                if entry.is_expired(now) {
                    *entry = self.fresh_entry(now);
                    debug!(identifier, "previous window expired, starting new one");
                    return AttemptOutcome::allowed(max_attempts - 1, entry.window_reset_at);
                }

                if entry.blocked {
                    debug!(identifier, reset_at = %entry.window_reset_at, "attempt while blocked");
                    return AttemptOutcome::denied(entry.window_reset_at);
                }

                entry.count += 1;

                if entry.count >= max_attempts {
                    entry.blocked = true;
                    entry.window_reset_at = now + self.config.block_duration;
                    RATE_LIMIT_BLOCKS.inc();
                    warn!(
                        identifier,
                        attempts = entry.count,
                        blocked_until = %entry.window_reset_at,
                        "identifier blocked after too many attempts"
                    );
                    return AttemptOutcome::denied(entry.window_reset_at);
                }

                debug!(identifier, attempts = entry.count, "attempt recorded");
                AttemptOutcome::allowed(max_attempts - entry.count, entry.window_reset_at)
            }
        }
    }

    // Never mutates; an expired entry is reported as absent but left in place
    pub fn peek_status(&self, identifier: &str) -> RateLimitStatus {
        let now = self.clock.now();

        match self.entries.get(identifier) {
            Some(entry) if !entry.is_expired(now) => {
                if entry.blocked {
                    RateLimitStatus {
                        remaining_attempts: 0,
                        reset_at: entry.window_reset_at,
                        blocked: true,
                    }
                } else {
                    RateLimitStatus {
                        remaining_attempts: self.config.max_attempts.saturating_sub(entry.count),
                        reset_at: entry.window_reset_at,
                        blocked: false,
                    }
                }
            }
            _ => RateLimitStatus {
                remaining_attempts: self.config.max_attempts,
                reset_at: now + self.config.window,
                blocked: false,
            },
        }
    }

    pub fn reset(&self, identifier: &str) {
        if self.entries.remove(identifier).is_some() {
            debug!(identifier, "rate limit entry cleared");
        }
    }

    // Drop every entry whose window or block has run out
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            let keep = !entry.is_expired(now);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    fn fresh_entry(&self, now: DateTime<Utc>) -> RateLimitEntry {
        RateLimitEntry {
            count: 1,
            window_reset_at: now + self.config.window,
            blocked: false,
        }
    }
}
