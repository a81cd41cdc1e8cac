//! Sliding-window rate limiter
//!
//! Explicit, injected component for throttling bursty caller actions
//! (login attempts, rapid expense creation). Constructed per process
//! and passed where needed; the current instant is a parameter so the
//! limiter stays deterministic under test.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

/// Attempt budget over a sliding window.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub max_attempts: usize,
    pub window: Duration,
}

impl RateLimitConfig {
    /// 5 attempts per 15 minutes.
    pub fn login() -> Self {
        Self {
            max_attempts: 5,
            window: Duration::minutes(15),
        }
    }

    /// 3 attempts per hour.
    pub fn register() -> Self {
        Self {
            max_attempts: 3,
            window: Duration::hours(1),
        }
    }

    /// 30 records per minute.
    pub fn add_expense() -> Self {
        Self {
            max_attempts: 30,
            window: Duration::minutes(1),
        }
    }
}

/// Per-key sliding-window limiter over explicit timestamps.
#[derive(Debug, Default)]
pub struct RateLimiter {
    attempts: HashMap<String, Vec<DateTime<Utc>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an attempt for `key` at `now`. Returns `false` when the
    /// window budget is already spent (the attempt is not recorded).
    pub fn check(&mut self, key: &str, config: &RateLimitConfig, now: DateTime<Utc>) -> bool {
        let window_start = now - config.window;

        let attempts = self.attempts.entry(key.to_string()).or_default();
        attempts.retain(|stamp| *stamp > window_start);

        if attempts.len() >= config.max_attempts {
            tracing::warn!(key, "Rate limit exceeded");
            return false;
        }

        attempts.push(now);
        true
    }

    /// How many attempts remain for `key` within the window ending at
    /// `now`.
    pub fn remaining_attempts(
        &self,
        key: &str,
        config: &RateLimitConfig,
        now: DateTime<Utc>,
    ) -> usize {
        let window_start = now - config.window;
        let used = self
            .attempts
            .get(key)
            .map(|stamps| stamps.iter().filter(|s| **s > window_start).count())
            .unwrap_or(0);

        config.max_attempts.saturating_sub(used)
    }

    /// Forget all attempts for `key`.
    pub fn reset(&mut self, key: &str) {
        self.attempts.remove(key);
    }
}
